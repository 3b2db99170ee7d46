// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Diver profile page parsing

use tracing::debug;

use super::table::rows_of;
use super::types::PageRow;

/// Extracts the meet list of a diver profile page
///
/// The rows are what the profile-meets cache stores per profile URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileMeetsParser;

impl ProfileMeetsParser {
    pub fn new() -> Self {
        Self
    }

    /// Every table row with at least one non-empty cell
    pub fn parse(&self, html: &str) -> Vec<PageRow> {
        let rows: Vec<PageRow> = rows_of(html, "tr")
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        debug!("Parsed {} profile meet rows", rows.len());
        rows
    }
}
