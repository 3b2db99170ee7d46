// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Render → parse → publish orchestration

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::renderer::{HttpRenderer, PageRenderer, RenderedPage};
use crate::cache::{CacheRegistry, CachedValue, PAGE_HTML, PROFILE_HTML, PROFILE_MEETS};
use crate::config::{AppConfig, SiteConfig};
use crate::fetch::{FetchError, Fetcher};
use crate::parse::{
    EntriesParser, EntryRecord, EventPageParser, PageKind, PageRow, ProfileMeetsParser,
    RankedRow, ScoreMap, ScoringParser, StructuredResult,
};
use crate::store::{MeetRecord, MeetStore};

/// Turns page URLs into structured results, caching what it renders
///
/// Result pages are cached as raw HTML in the page-HTML cache. Profile pages
/// go to the profile-HTML cache and their parsed meet rows to the
/// profile-meets cache, so a repeat lookup parses nothing.
pub struct Pipeline {
    renderer: Arc<dyn PageRenderer>,
    registry: Arc<CacheRegistry>,
    event_parser: EventPageParser,
    scoring_parser: ScoringParser,
    entries_parser: EntriesParser,
    profile_parser: ProfileMeetsParser,
}

impl Pipeline {
    pub fn new(renderer: Arc<dyn PageRenderer>, registry: Arc<CacheRegistry>, site: &SiteConfig) -> Self {
        Self {
            renderer,
            registry,
            event_parser: EventPageParser::new(site.base_url.clone()),
            scoring_parser: ScoringParser::new(site.judge_score_style.clone()),
            entries_parser: EntriesParser::new(site.base_url.clone()),
            profile_parser: ProfileMeetsParser::new(),
        }
    }

    /// Pipeline rendering over HTTP with the given registry
    pub fn from_config(config: &AppConfig, registry: Arc<CacheRegistry>) -> Result<Self, FetchError> {
        let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);
        let renderer = Arc::new(HttpRenderer::new(fetcher));
        Ok(Self::new(renderer, registry, &config.site))
    }

    /// Replace the entries parser, e.g. to keep unterminated records
    pub fn with_entries_parser(mut self, parser: EntriesParser) -> Self {
        self.entries_parser = parser;
        self
    }

    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    /// Render (or reuse) `url` and parse it as `kind`
    ///
    /// `None` means the page could not be rendered, or it is an entries page
    /// without the expected tables.
    pub async fn process(&self, url: &str, kind: PageKind) -> Option<StructuredResult> {
        debug!("Processing {} as {:?}", url, kind);

        if kind == PageKind::ProfileMeets {
            return self.profile_meets(url).await.map(StructuredResult::ProfileMeets);
        }

        let html = self.html_for(url, PAGE_HTML).await?;
        self.process_rendered(&RenderedPage::new(url, html), kind)
    }

    /// Parse an already rendered page, bypassing renderer and caches
    pub fn process_rendered(&self, page: &RenderedPage, kind: PageKind) -> Option<StructuredResult> {
        let result = match kind {
            PageKind::EventResults => StructuredResult::Ranked(self.event_parser.parse(&page.html)),
            PageKind::JudgeScores => StructuredResult::Scores(self.scoring_parser.parse(&page.html)),
            PageKind::Entries => match self.entries_parser.parse(&page.html) {
                Some(entries) => StructuredResult::Entries(entries),
                None => {
                    warn!("{} is not an entries page", page.url);
                    return None;
                }
            },
            PageKind::ProfileMeets => StructuredResult::ProfileMeets(self.profile_parser.parse(&page.html)),
        };

        if result.is_empty() {
            debug!("No {:?} records in {}", kind, page.url);
        }
        Some(result)
    }

    /// Process several pages of one kind concurrently, results in input order
    ///
    /// Fetch concurrency is bounded by the renderer's fetcher.
    pub async fn scrape_many(&self, urls: &[String], kind: PageKind) -> Vec<Option<StructuredResult>> {
        let results = join_all(urls.iter().map(|url| self.process(url, kind))).await;
        let parsed = results.iter().filter(|r| r.is_some()).count();
        info!("Scraped {}/{} {:?} pages", parsed, urls.len(), kind);
        results
    }

    pub async fn event_results(&self, url: &str) -> Vec<RankedRow> {
        match self.process(url, PageKind::EventResults).await {
            Some(StructuredResult::Ranked(rows)) => rows,
            _ => Vec::new(),
        }
    }

    pub async fn judge_scores(&self, url: &str) -> ScoreMap {
        match self.process(url, PageKind::JudgeScores).await {
            Some(StructuredResult::Scores(scores)) => scores,
            _ => ScoreMap::new(),
        }
    }

    pub async fn entries(&self, url: &str) -> Option<Vec<EntryRecord>> {
        match self.process(url, PageKind::Entries).await {
            Some(StructuredResult::Entries(entries)) => Some(entries),
            _ => None,
        }
    }

    /// Meet rows of a diver profile, from the profile-meets cache when fresh
    pub async fn profile_meets(&self, url: &str) -> Option<Vec<PageRow>> {
        if let Some(rows) = self.registry.get(PROFILE_MEETS, url).and_then(CachedValue::into_rows) {
            debug!("Profile meets cache hit for {}", url);
            return Some(rows);
        }

        let html = self.html_for(url, PROFILE_HTML).await?;
        let rows = self.profile_parser.parse(&html);

        if let Err(e) = self.registry.set(PROFILE_MEETS, url, CachedValue::Rows(rows.clone())) {
            warn!("Failed to cache profile meets for {}: {}", url, e);
        }
        Some(rows)
    }

    /// Page HTML from `cache_name`, rendering and caching it on a miss
    pub async fn html_for(&self, url: &str, cache_name: &str) -> Option<String> {
        if let Some(html) = self.registry.get(cache_name, url).and_then(CachedValue::into_text) {
            debug!("{} cache hit for {}", cache_name, url);
            return Some(html);
        }

        let page = self.renderer.render(url).await?;
        if let Err(e) = self.registry.set(cache_name, url, CachedValue::Text(page.html.clone())) {
            warn!("Failed to cache {} for {}: {}", cache_name, url, e);
        }
        Some(page.html)
    }

    /// Store the meets of profile rows, skipping ones already stored
    ///
    /// Rows without a year (table headers, blank lines) are not meets.
    /// Returns how many meets were added.
    pub async fn record_meets(&self, store: &dyn MeetStore, rows: &[PageRow]) -> usize {
        let records: Vec<MeetRecord> = rows
            .iter()
            .filter_map(|row| MeetRecord::from_profile_row(row, None))
            .filter(|record| record.year.is_some())
            .collect();

        let offered = records.len();
        let added = store.add_all(records).await;
        debug!("Recorded {} of {} meets", added, offered);
        added
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("renderer", &self.renderer.name())
            .field("caches", &self.registry.names())
            .finish()
    }
}
