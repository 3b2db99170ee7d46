// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML page parsing
//!
//! `table` turns rows into cell texts; the other modules each understand one
//! page layout of the results site.

pub mod entries;
pub mod event;
pub mod profile;
pub mod scoring;
pub mod table;
pub mod types;

pub use entries::{EntriesParser, DD_TOTAL_MARKER};
pub use event::EventPageParser;
pub use profile::ProfileMeetsParser;
pub use scoring::{ScoringParser, DEFAULT_JUDGE_SCORE_STYLE};
pub use table::{rows_of, tables_of};
pub use types::{
    Dive, EntryRecord, PageKind, PageRow, RankedRow, ScoreMap, StructuredResult,
};
