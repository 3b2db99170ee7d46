// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Event results page parsing

use tracing::{debug, warn};

use super::table::{absolute_link, cell_text, cells, first_link, parse_document, select_all};
use super::types::RankedRow;

/// Rows before this index are event headers and metadata
pub const HEADER_ROWS: usize = 5;
/// Row whose text is copied into every result's `diff`
pub const REFERENCE_ROW: usize = 2;
/// Cells a result row needs: name, team, (unused), score, differential
const MIN_RESULT_CELLS: usize = 5;

/// Parses an event results table into ranked rows
#[derive(Debug, Clone)]
pub struct EventPageParser {
    base_url: String,
}

impl EventPageParser {
    /// Create a parser resolving relative links against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Parse the results rows of `html`
    ///
    /// Rows `5..N-1` of the page's `N` rows are results, the last row is a
    /// footer. Places are numbered from the row position, so a skipped row
    /// still consumes its place.
    pub fn parse(&self, html: &str) -> Vec<RankedRow> {
        let Some(document) = parse_document(html) else {
            return Vec::new();
        };

        let rows = select_all(&document, "tr");
        if rows.len() <= HEADER_ROWS + 1 {
            debug!("Event page has {} rows, no results", rows.len());
            return Vec::new();
        }

        let diff = rows.get(REFERENCE_ROW).map(cell_text).unwrap_or_default();

        let mut results = Vec::with_capacity(rows.len() - HEADER_ROWS - 1);
        for (index, row) in rows.iter().enumerate().take(rows.len() - 1).skip(HEADER_ROWS) {
            let row_cells = cells(row);
            if row_cells.len() < MIN_RESULT_CELLS {
                warn!("Skipping event row {} with {} cells", index, row_cells.len());
                continue;
            }

            results.push(RankedRow {
                place: (index - (HEADER_ROWS - 1)) as u32,
                name: cell_text(&row_cells[0]),
                name_link: self.link_of(&row_cells[0]),
                team: cell_text(&row_cells[1]),
                team_link: self.link_of(&row_cells[1]),
                score: cell_text(&row_cells[3]),
                score_link: self.link_of(&row_cells[3]),
                score_diff: cell_text(&row_cells[4]),
                diff: diff.clone(),
            });
        }

        debug!("Parsed {} event results", results.len());
        results
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn link_of(&self, cell: &scraper::ElementRef) -> String {
        first_link(cell)
            .map(|href| absolute_link(&self.base_url, &href))
            .unwrap_or_default()
    }
}
