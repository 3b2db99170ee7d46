// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Meet record store boundary
//!
//! The long-term store lives outside this crate. [`MeetStore`] is the seam it
//! plugs into; [`InMemoryMeetStore`] backs tests and the CLI.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// One meet as the record store sees it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub org: Option<String>,
    pub year: Option<i32>,
    pub link: Option<String>,
}

impl MeetRecord {
    /// Build a record from a profile meet row
    ///
    /// The first cell is the meet name, the second (if any) the organisation,
    /// and the first four-digit number found in a later cell the year. Rows
    /// with an empty first cell yield `None`.
    pub fn from_profile_row(row: &[String], link: Option<String>) -> Option<Self> {
        let name = row.first().map(|s| s.trim()).filter(|s| !s.is_empty())?;

        let org = row
            .get(1)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let year = row.iter().skip(1).find_map(|cell| {
            cell.split(|c: char| !c.is_ascii_digit())
                .find(|token| token.len() == 4)
                .and_then(|token| token.parse().ok())
        });

        Some(Self {
            id: None,
            name: Some(name.to_string()),
            org,
            year,
            link,
        })
    }

    /// True if both records describe the same meet
    ///
    /// Ids decide when both records have one; otherwise name, organisation
    /// and year must all agree.
    pub fn same_meet(&self, other: &MeetRecord) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name && self.org == other.org && self.year == other.year,
        }
    }
}

/// Persistent store of meet records
///
/// `remove` and `remove_all` are the boundary's "drop" operations.
#[async_trait]
pub trait MeetStore: Send + Sync {
    /// Add `record` unless an equal meet is stored; true if it was added
    async fn add(&self, record: MeetRecord) -> bool;

    /// Remove every stored record describing the same meet; true if any went
    async fn remove(&self, record: &MeetRecord) -> bool;

    async fn contains(&self, record: &MeetRecord) -> bool;

    /// Add each record not already stored, returning how many were added
    async fn add_all(&self, records: Vec<MeetRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.add(record).await {
                added += 1;
            }
        }
        added
    }

    /// Remove each record, returning how many were present
    async fn remove_all(&self, records: &[MeetRecord]) -> usize {
        let mut removed = 0;
        for record in records {
            if self.remove(record).await {
                removed += 1;
            }
        }
        removed
    }

    /// Every stored record in insertion order
    async fn all(&self) -> Vec<MeetRecord>;
}

/// Process-local [`MeetStore`]
#[derive(Debug, Default)]
pub struct InMemoryMeetStore {
    records: RwLock<Vec<MeetRecord>>,
}

impl InMemoryMeetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MeetStore for InMemoryMeetStore {
    async fn add(&self, record: MeetRecord) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.iter().any(|r| r.same_meet(&record)) {
            debug!("Meet already stored: {:?}", record.name);
            return false;
        }
        records.push(record);
        true
    }

    async fn remove(&self, record: &MeetRecord) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|r| !r.same_meet(record));
        records.len() != before
    }

    async fn contains(&self, record: &MeetRecord) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|r| r.same_meet(record))
    }

    async fn all(&self) -> Vec<MeetRecord> {
        self.records.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
