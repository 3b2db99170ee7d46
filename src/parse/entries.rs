// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Event entry list parsing
//!
//! An entry list is one linear run of table rows in which each diver's block
//! looks like:
//!
//! ```text
//! <b><a href=profile>Last, First</a></b> Team   <b>Board: 1M</b>    header
//! | 1 | 105B | 1M | Forward 2 1/2 Somersault Pike | 2.4 |            dive
//! | 2 | 203C | 1M | Back 1 1/2 Somersault Tuck    | 2.0 |            dive
//! <b>DD Total</b> <b>4.4</b>                                        terminator
//! ```
//!
//! Rows are classified one at a time. A record is only emitted when its
//! `DD Total` row is reached.

use scraper::ElementRef;
use tracing::{debug, warn};

use super::table::{
    absolute_link, cell_text, cells, first_link, parse_document, select_all, select_within,
};
use super::types::{Dive, EntryRecord};

/// Text of the bold cell closing a diver's block
pub const DD_TOTAL_MARKER: &str = "DD Total";

/// Cell count a dive row must exceed
const MIN_DIVE_CELLS: usize = 4;

/// How a single row of the entries table is handled
#[derive(Debug)]
enum RowKind<'a> {
    /// Bold profile link: opens a new record
    Header {
        bolds: Vec<ElementRef<'a>>,
        link: ElementRef<'a>,
    },
    /// Bold "DD Total": closes the open record
    Terminator { bolds: Vec<ElementRef<'a>> },
    /// Plain row with enough cells for a dive
    Dive(Vec<ElementRef<'a>>),
    Other,
}

/// Parses event entry lists into per-diver records
#[derive(Debug, Clone)]
pub struct EntriesParser {
    base_url: String,
    keep_unterminated: bool,
    require_header: bool,
}

impl EntriesParser {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            keep_unterminated: false,
            require_header: false,
        }
    }

    /// Emit records that never reach a `DD Total` row instead of dropping them
    pub fn keep_unterminated(mut self, keep: bool) -> Self {
        self.keep_unterminated = keep;
        self
    }

    pub fn keeps_unterminated(&self) -> bool {
        self.keep_unterminated
    }

    /// Discard records closed by `DD Total` that never saw a diver header row
    pub fn require_header(mut self, require: bool) -> Self {
        self.require_header = require;
        self
    }

    pub fn requires_header(&self) -> bool {
        self.require_header
    }

    /// Parse the entries of the page's second table
    ///
    /// Returns `None` when the page has fewer than two tables, meaning it is
    /// not an entry list at all. `Some(vec![])` is a list with no divers.
    pub fn parse(&self, html: &str) -> Option<Vec<EntryRecord>> {
        let document = parse_document(html)?;

        let tables = select_all(&document, "table");
        let Some(table) = tables.get(1) else {
            warn!("Entries page has {} tables, expected at least 2", tables.len());
            return None;
        };

        let mut entries = Vec::new();
        let mut current = EntryRecord::default();

        for row in select_within(table, "tr") {
            match classify(&row) {
                RowKind::Header { bolds, link } => {
                    if current.has_header() {
                        self.close_unterminated(current, &mut entries);
                    }
                    current = self.open_record(&row, &bolds, &link);
                }
                RowKind::Terminator { bolds } => {
                    current.total_dd = bolds
                        .get(1)
                        .map(|b| parse_decimal(&cell_text(b)))
                        .unwrap_or(0.0);

                    if self.require_header && !current.has_header() {
                        debug!("DD Total row without a diver header, skipping");
                        current = EntryRecord::default();
                    } else {
                        entries.push(std::mem::take(&mut current));
                    }
                }
                RowKind::Dive(row_cells) => current.dives.push(dive_from(&row_cells)),
                RowKind::Other => {}
            }
        }

        if current.has_header() {
            self.close_unterminated(current, &mut entries);
        }

        debug!("Parsed {} entries", entries.len());
        Some(entries)
    }

    fn close_unterminated(&self, record: EntryRecord, entries: &mut Vec<EntryRecord>) {
        if self.keep_unterminated {
            entries.push(record);
        } else {
            debug!(
                "Dropping entry for {}, {} without a {} row",
                record.last_name, record.first_name, DD_TOTAL_MARKER
            );
        }
    }

    fn open_record(&self, row: &ElementRef, bolds: &[ElementRef], link: &ElementRef) -> EntryRecord {
        let full_name = cell_text(link);
        let (last_name, first_name) = match full_name.split_once(", ") {
            Some((last, first)) => (last.to_string(), first.to_string()),
            None => (full_name.clone(), String::new()),
        };

        let board = bolds.get(1).map(cell_text).map(|text| match text.split_once(": ") {
            Some((_, label)) => label.trim().to_string(),
            None => text,
        });

        EntryRecord {
            first_name,
            last_name,
            team: team_of(row, &bolds[0]),
            link: first_link(link)
                .map(|href| absolute_link(&self.base_url, &href))
                .unwrap_or_default(),
            board,
            dives: Vec::new(),
            total_dd: 0.0,
        }
    }
}

fn classify<'a>(row: &ElementRef<'a>) -> RowKind<'a> {
    let bolds = select_within(row, "b");

    let header_link = bolds
        .iter()
        .find_map(|b| select_within(b, "a[href]").into_iter().next());
    if let Some(link) = header_link {
        // The name bold must come first so team and board lookups line up
        let bolds = match bolds.iter().position(|b| b.descendants().any(|n| n.id() == link.id())) {
            Some(pos) => bolds[pos..].to_vec(),
            None => bolds,
        };
        return RowKind::Header { bolds, link };
    }

    if bolds.first().is_some_and(|b| cell_text(b).contains(DD_TOTAL_MARKER)) {
        return RowKind::Terminator { bolds };
    }

    let row_cells = cells(row);
    if bolds.is_empty() && row_cells.len() > MIN_DIVE_CELLS {
        return RowKind::Dive(row_cells);
    }

    RowKind::Other
}

/// Team name beside the diver's name
///
/// Text of the name's cell outside the bold, or failing that the first
/// later cell without bold text.
fn team_of(row: &ElementRef, name_bold: &ElementRef) -> String {
    let row_cells = cells(row);
    let name_cell = row_cells
        .iter()
        .position(|cell| cell.descendants().any(|n| n.id() == name_bold.id()));

    if let Some(pos) = name_cell {
        let outside = cell_text(&row_cells[pos]).replacen(&cell_text(name_bold), "", 1);
        let team = clean_team(&outside);
        if !team.is_empty() {
            return team;
        }

        return row_cells[pos + 1..]
            .iter()
            .filter(|cell| select_within(cell, "b").is_empty())
            .map(|cell| clean_team(&cell_text(cell)))
            .find(|team| !team.is_empty())
            .unwrap_or_default();
    }

    String::new()
}

fn clean_team(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | ')' | ','))
        .to_string()
}

fn dive_from(row_cells: &[ElementRef]) -> Dive {
    let height_text = cell_text(&row_cells[2]);
    Dive {
        number: cell_text(&row_cells[1]),
        height: strip_unit(&height_text).parse().unwrap_or(0),
        name: cell_text(&row_cells[3]),
        dd: parse_decimal(&cell_text(&row_cells[4])),
    }
}

/// Drop a single trailing unit character such as the `M` in `3M`
fn strip_unit(text: &str) -> &str {
    match text.chars().last() {
        Some(unit) if !unit.is_ascii_digit() => &text[..text.len() - unit.len_utf8()],
        _ => text,
    }
}

fn parse_decimal(text: &str) -> f64 {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}
