// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process-wide registry of named caches
//!
//! The registry maps a logical cache name to a [`NamedCache`]. Every
//! operation except [`CacheRegistry::clear_all`] and [`CacheRegistry::reset`]
//! mutates the existing caches in place, so `Arc<NamedCache>` handles taken
//! earlier keep seeing the live data.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::CacheConfig;
use super::error::CacheError;
use super::expiring::{CacheMetrics, ExpiringCache};
use super::persist::remove_cache_file;

/// Meets listed on a diver profile, one row of cell texts per meet
pub type MeetRows = Vec<Vec<String>>;

/// Registry name (and file stem) of the profile-meets cache
pub const PROFILE_MEETS: &str = "profileMeets";
/// Registry name (and file stem) of the profile-HTML cache
pub const PROFILE_HTML: &str = "profileHTML";
/// Registry name of the in-memory rendered page cache
pub const PAGE_HTML: &str = "pageHTML";

/// Shortest sweep period; `tokio::time::interval` rejects zero
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

static GLOBAL: OnceLock<Arc<CacheRegistry>> = OnceLock::new();

/// A cache with a fixed value shape
pub enum NamedCache {
    /// Parsed meet rows per profile URL, persisted
    ProfileMeets(ExpiringCache<String, MeetRows>),
    /// Raw profile page HTML per URL, persisted
    ProfileHtml(ExpiringCache<String, String>),
    /// Raw result page HTML per URL, memory only
    PageHtml(ExpiringCache<String, String>),
}

/// Value stored in or read from a [`NamedCache`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CachedValue {
    Rows(MeetRows),
    Text(String),
}

impl CachedValue {
    pub fn into_rows(self) -> Option<MeetRows> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Text(_) => None,
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::Rows(_) => "row-list",
            Self::Text(_) => "text",
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Rows(_) => None,
        }
    }
}

/// Per-cache summary for status output
#[derive(Debug, Clone, Serialize)]
pub struct NamedCacheStats {
    pub name: String,
    pub entries: usize,
    pub capacity: usize,
    pub persistent: bool,
    pub metrics: CacheMetrics,
}

impl NamedCache {
    /// The default variant set, keyed by registry name
    pub fn defaults(config: &CacheConfig) -> Vec<(&'static str, NamedCache)> {
        vec![
            (
                PROFILE_MEETS,
                NamedCache::ProfileMeets(ExpiringCache::from_config(config)),
            ),
            (
                PROFILE_HTML,
                NamedCache::ProfileHtml(ExpiringCache::from_config(config)),
            ),
            (
                PAGE_HTML,
                NamedCache::PageHtml(ExpiringCache::from_config(config)),
            ),
        ]
    }

    /// On-disk file stem, `None` for memory-only caches
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            Self::ProfileMeets(_) | Self::ProfileHtml(_) => Some(self.name()),
            Self::PageHtml(_) => None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.file_name().is_some()
    }

    /// Registry name of this variant
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProfileMeets(_) => PROFILE_MEETS,
            Self::ProfileHtml(_) => PROFILE_HTML,
            Self::PageHtml(_) => PAGE_HTML,
        }
    }

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        match self {
            Self::ProfileMeets(cache) => cache.lookup(key).map(CachedValue::Rows),
            Self::ProfileHtml(cache) | Self::PageHtml(cache) => {
                cache.lookup(key).map(CachedValue::Text)
            }
        }
    }

    pub fn set(&self, key: &str, value: CachedValue) -> Result<(), CacheError> {
        match (self, value) {
            (Self::ProfileMeets(cache), CachedValue::Rows(rows)) => {
                cache.insert(key.to_string(), rows);
                Ok(())
            }
            (Self::ProfileHtml(cache) | Self::PageHtml(cache), CachedValue::Text(text)) => {
                cache.insert(key.to_string(), text);
                Ok(())
            }
            (cache, value) => Err(CacheError::ShapeMismatch {
                name: cache.name().to_string(),
                shape: value.shape(),
            }),
        }
    }

    pub fn remove(&self, key: &str) {
        match self {
            Self::ProfileMeets(cache) => {
                cache.remove(key);
            }
            Self::ProfileHtml(cache) | Self::PageHtml(cache) => {
                cache.remove(key);
            }
        }
    }

    /// Persist to `dir`; `Ok(None)` for memory-only caches
    pub fn save(&self, dir: &Path) -> Result<Option<PathBuf>, CacheError> {
        match self {
            Self::ProfileMeets(cache) => cache.save_to_disk(dir, PROFILE_MEETS).map(Some),
            Self::ProfileHtml(cache) => cache.save_to_disk(dir, PROFILE_HTML).map(Some),
            Self::PageHtml(_) => Ok(None),
        }
    }

    /// Replace contents with the on-disk snapshot, returning entries loaded
    pub fn load(&self, dir: &Path) -> usize {
        match self {
            Self::ProfileMeets(cache) => cache.load_from_disk(dir, PROFILE_MEETS),
            Self::ProfileHtml(cache) => cache.load_from_disk(dir, PROFILE_HTML),
            Self::PageHtml(_) => 0,
        }
    }

    /// Empty the cache and remove its backing file
    pub fn clear(&self, dir: &Path) -> Result<(), CacheError> {
        match self {
            Self::ProfileMeets(cache) => cache.clear(),
            Self::ProfileHtml(cache) | Self::PageHtml(cache) => cache.clear(),
        }
        if let Some(name) = self.file_name() {
            remove_cache_file(dir, name)?;
        }
        Ok(())
    }

    pub fn purge_expired(&self) -> usize {
        match self {
            Self::ProfileMeets(cache) => cache.purge_expired(),
            Self::ProfileHtml(cache) | Self::PageHtml(cache) => cache.purge_expired(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::ProfileMeets(cache) => cache.len(),
            Self::ProfileHtml(cache) | Self::PageHtml(cache) => cache.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self, name: &str) -> NamedCacheStats {
        let (capacity, metrics) = match self {
            Self::ProfileMeets(cache) => (cache.capacity(), cache.metrics()),
            Self::ProfileHtml(cache) | Self::PageHtml(cache) => (cache.capacity(), cache.metrics()),
        };
        NamedCacheStats {
            name: name.to_string(),
            entries: self.len(),
            capacity,
            persistent: self.is_persistent(),
            metrics,
        }
    }
}

/// Named collection of caches with save/load/clear lifecycle
pub struct CacheRegistry {
    caches: RwLock<HashMap<String, Arc<NamedCache>>>,
    config: CacheConfig,
}

impl CacheRegistry {
    /// Registry holding the default variant set
    pub fn new(config: CacheConfig) -> Self {
        Self {
            caches: RwLock::new(Self::default_map(&config)),
            config,
        }
    }

    /// The process-wide registry, created from the environment on first use
    pub fn global() -> Arc<CacheRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(CacheRegistry::new(CacheConfig::from_env())))
            .clone()
    }

    /// Initialise the process-wide registry with explicit settings
    ///
    /// Only the first call (or first [`global`](Self::global)) decides the
    /// configuration; later calls log and return the existing registry.
    pub fn init(config: CacheConfig) -> Arc<CacheRegistry> {
        let mut fresh = Some(config);
        let registry = GLOBAL.get_or_init(|| {
            Arc::new(CacheRegistry::new(fresh.take().unwrap_or_default()))
        });
        if fresh.is_some() {
            warn!("Cache registry already initialised, keeping existing configuration");
        }
        registry.clone()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    fn default_map(config: &CacheConfig) -> HashMap<String, Arc<NamedCache>> {
        NamedCache::defaults(config)
            .into_iter()
            .map(|(name, cache)| (name.to_string(), Arc::new(cache)))
            .collect()
    }

    fn entries(&self) -> Vec<(String, Arc<NamedCache>)> {
        let caches = self.caches.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<_> = caches
            .iter()
            .map(|(name, cache)| (name.clone(), cache.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Handle to a named cache
    pub fn cache(&self, name: &str) -> Option<Arc<NamedCache>> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    pub fn get(&self, name: &str, key: &str) -> Option<CachedValue> {
        let cache = self.cache(name)?;
        cache.get(key)
    }

    pub fn set(&self, name: &str, key: &str, value: CachedValue) -> Result<(), CacheError> {
        let cache = self
            .cache(name)
            .ok_or_else(|| CacheError::UnknownCache(name.to_string()))?;
        cache.set(key, value)
    }

    pub fn remove(&self, name: &str, key: &str) {
        if let Some(cache) = self.cache(name) {
            cache.remove(key);
        }
    }

    /// Persist every persistent cache, returning how many were written
    pub fn save_all(&self) -> usize {
        let mut saved = 0;
        for (name, cache) in self.entries() {
            match cache.save(self.cache_dir()) {
                Ok(Some(path)) => {
                    debug!("Saved cache '{}' to {}", name, path.display());
                    saved += 1;
                }
                Ok(None) => debug!("Cache '{}' is memory-only, not saved", name),
                Err(e) => warn!("Failed to save cache '{}': {}", name, e),
            }
        }
        info!("Saved {} caches to {}", saved, self.cache_dir().display());
        saved
    }

    /// Reload every persistent cache in place, returning entries loaded
    pub fn load_all(&self) -> usize {
        let loaded: usize = self
            .entries()
            .iter()
            .map(|(_, cache)| cache.load(self.cache_dir()))
            .sum();
        info!("Loaded {} cache entries from {}", loaded, self.cache_dir().display());
        loaded
    }

    /// Remove every backing file and start over with fresh caches
    pub fn clear_all(&self) {
        for (name, cache) in self.entries() {
            if let Err(e) = cache.clear(self.cache_dir()) {
                warn!("Failed to clear cache '{}': {}", name, e);
            }
        }
        self.reset();
        info!("Cleared all caches");
    }

    /// Swap in a fresh default variant set without touching disk
    pub fn reset(&self) {
        let fresh = Self::default_map(&self.config);
        *self.caches.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    /// Reclaim expired entries in every cache
    pub fn purge_expired(&self) -> usize {
        self.entries()
            .iter()
            .map(|(_, cache)| cache.purge_expired())
            .sum()
    }

    pub fn stats(&self) -> Vec<NamedCacheStats> {
        self.entries()
            .iter()
            .map(|(name, cache)| cache.stats(name))
            .collect()
    }

    /// Periodically purge expired entries until the registry is dropped
    ///
    /// Without a sweeper, expired entries are only reclaimed on access,
    /// capacity eviction, or a save/load cycle. Periods below one
    /// millisecond are raised to one millisecond.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        if every < MIN_SWEEP_INTERVAL {
            warn!("Sweep interval {:?} too short, using {:?}", every, MIN_SWEEP_INTERVAL);
        }
        let every = every.max(MIN_SWEEP_INTERVAL);
        let registry: Weak<CacheRegistry> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    debug!("Cache registry dropped, stopping sweeper");
                    break;
                };
                let purged = registry.purge_expired();
                if purged > 0 {
                    debug!("Sweeper purged {} expired cache entries", purged);
                }
            }
        })
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
