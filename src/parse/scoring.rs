// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Judge score sheet parsing

use tracing::debug;

use super::table::{cell_text, parse_document, select_all};
use super::types::ScoreMap;

/// Inline style the results site puts on judge score cells
pub const DEFAULT_JUDGE_SCORE_STYLE: &str = "background-color: #ffffcc";

/// Maps judge score cells to 1-based judge indices
#[derive(Debug, Clone)]
pub struct ScoringParser {
    style_marker: String,
}

impl ScoringParser {
    pub fn new(style_marker: impl Into<String>) -> Self {
        Self {
            style_marker: style_marker.into(),
        }
    }

    /// Parse the judge scores of one dive
    ///
    /// The i-th cell whose `style` contains the marker becomes judge i.
    /// Text that is not a number scores 0.0.
    pub fn parse(&self, html: &str) -> ScoreMap {
        let Some(document) = parse_document(html) else {
            return ScoreMap::new();
        };

        let marker = compact(&self.style_marker);
        let scores: ScoreMap = select_all(&document, "td[style], th[style]")
            .into_iter()
            .filter(|cell| {
                cell.value()
                    .attr("style")
                    .is_some_and(|style| compact(style).contains(&marker))
            })
            .enumerate()
            .map(|(i, cell)| (i + 1, parse_score(&cell_text(&cell))))
            .collect();

        debug!("Parsed {} judge scores", scores.len());
        scores
    }

    pub fn style_marker(&self) -> &str {
        &self.style_marker
    }
}

impl Default for ScoringParser {
    fn default() -> Self {
        Self::new(DEFAULT_JUDGE_SCORE_STYLE)
    }
}

/// Lowercase with all whitespace removed
fn compact(style: &str) -> String {
    style
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_score(text: &str) -> f64 {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}
