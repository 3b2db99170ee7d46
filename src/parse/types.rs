// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structured records produced by the page parsers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cell texts of one table row, in document order
pub type PageRow = Vec<String>;

/// Judge index (1-based) → awarded score
pub type ScoreMap = BTreeMap<usize, f64>;

/// One competitor's line in an event results table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    /// 1-based finishing place
    pub place: u32,
    pub name: String,
    pub name_link: String,
    pub team: String,
    pub team_link: String,
    pub score: String,
    pub score_link: String,
    /// Points behind the row above, as printed
    pub score_diff: String,
    /// Text of the event's reference row, shared by every row
    pub diff: String,
}

/// One planned dive on an entry list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dive {
    /// Dive code, e.g. "105B"
    pub number: String,
    /// Board height in metres
    pub height: u32,
    pub name: String,
    /// Degree of difficulty
    pub dd: f64,
}

/// One diver on an event entry list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub first_name: String,
    pub last_name: String,
    pub team: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    pub dives: Vec<Dive>,
    #[serde(rename = "totalDD")]
    pub total_dd: f64,
}

impl EntryRecord {
    /// True once a diver header row has filled in the name
    pub fn has_header(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty() || !self.link.is_empty()
    }
}

/// Kind of page handed to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// Event results table
    EventResults,
    /// Judge score sheet for one dive
    JudgeScores,
    /// Event entry list with planned dives
    Entries,
    /// Diver profile meet list
    ProfileMeets,
}

/// Parsed page, one variant per [`PageKind`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum StructuredResult {
    Ranked(Vec<RankedRow>),
    Scores(ScoreMap),
    Entries(Vec<EntryRecord>),
    ProfileMeets(Vec<PageRow>),
}

impl StructuredResult {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Ranked(_) => PageKind::EventResults,
            Self::Scores(_) => PageKind::JudgeScores,
            Self::Entries(_) => PageKind::Entries,
            Self::ProfileMeets(_) => PageKind::ProfileMeets,
        }
    }

    /// Number of top-level records
    pub fn len(&self) -> usize {
        match self {
            Self::Ranked(rows) => rows.len(),
            Self::Scores(scores) => scores.len(),
            Self::Entries(entries) => entries.len(),
            Self::ProfileMeets(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
