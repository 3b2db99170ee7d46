// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cache;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod store;
pub mod version;

// Re-export main types
pub use cache::{CacheConfig, CacheError, CacheRegistry, CachedValue, ExpiringCache, NamedCache};
pub use config::{AppConfig, SiteConfig};
pub use fetch::{FetchConfig, FetchError, Fetcher};
pub use parse::{
    EntriesParser, EntryRecord, EventPageParser, PageKind, ProfileMeetsParser, RankedRow,
    ScoreMap, ScoringParser, StructuredResult,
};
pub use pipeline::{HttpRenderer, PageRenderer, Pipeline, RenderedPage};
pub use store::{InMemoryMeetStore, MeetRecord, MeetStore};
