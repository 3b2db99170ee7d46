// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generic expiring cache with bounded capacity
//!
//! Entries live for a fixed lifetime (default 12 hours) and the cache holds at
//! most `capacity` of them (default 50). The storage engine is an LRU; when it
//! pushes out a victim the key is reported to the [`KeyTracker`] so the set
//! of tracked keys always equals the set of resident keys. Serialization
//! walks the tracker, see `persist.rs`.
//!
//! Expiry is lazy: an expired entry is only removed when it is looked up,
//! when capacity pressure evicts it, on [`ExpiringCache::purge_expired`], or
//! when a snapshot is reloaded from disk.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let cache: ExpiringCache<String, String> = ExpiringCache::default();
//! cache.insert("https://example.com/meet".to_string(), html);
//! if let Some(html) = cache.lookup("https://example.com/meet") {
//!     // fresh hit
//! }
//! ```

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::config::{CacheConfig, DEFAULT_CAPACITY, DEFAULT_LIFETIME_SECS};

/// Called with the key of every entry the LRU pushes out for capacity
pub type EvictionHook<K> = Arc<dyn Fn(&K) + Send + Sync>;

/// One cached value and the moment it stops being valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl<K, V> CacheEntry<K, V> {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Keys currently resident in the store
#[derive(Debug)]
pub struct KeyTracker<K> {
    keys: HashSet<K>,
}

impl<K: Hash + Eq> KeyTracker<K> {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    pub fn track(&mut self, key: K) {
        self.keys.insert(key);
    }

    /// Eviction notification from the store
    pub fn on_evicted<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.remove(key);
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<K: Hash + Eq> Default for KeyTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache counters for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    /// Capacity evictions
    pub evictions: u64,
    /// Entries removed because their lifetime ran out
    pub expirations: u64,
    pub inserts: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub(super) struct Inner<K: Hash + Eq, V> {
    pub(super) store: LruCache<K, CacheEntry<K, V>>,
    pub(super) tracker: KeyTracker<K>,
    pub(super) metrics: CacheMetrics,
}

/// Bounded, time-limited key/value store
///
/// All mutations (insert, lookup, remove, eviction, load) take the write
/// lock; [`peek`](Self::peek) and snapshots share the read lock.
pub struct ExpiringCache<K: Hash + Eq, V> {
    inner: RwLock<Inner<K, V>>,
    lifetime: chrono::Duration,
    capacity: NonZeroUsize,
    clock: Arc<dyn Clock>,
    on_evict: Option<EvictionHook<K>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache; a zero capacity is raised to one
    pub fn new(lifetime: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(Inner {
                store: LruCache::new(capacity),
                tracker: KeyTracker::new(),
                metrics: CacheMetrics::default(),
            }),
            lifetime: chrono::Duration::from_std(lifetime)
                .unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_LIFETIME_SECS as i64)),
            capacity,
            clock: Arc::new(SystemClock),
            on_evict: None,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.lifetime(), config.capacity)
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Observe capacity evictions
    pub fn with_eviction_hook(mut self, hook: EvictionHook<K>) -> Self {
        self.on_evict = Some(hook);
        self
    }

    /// Store `value` under `key`, valid for the configured lifetime
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.insert_entry(CacheEntry {
            key,
            value,
            expires_at,
        });
    }

    /// Insert keeping the entry's own expiry
    pub(super) fn insert_entry(&self, entry: CacheEntry<K, V>) {
        let evicted = {
            let mut guard = self.write();
            let inner = &mut *guard;
            let key = entry.key.clone();
            let evicted = match inner.store.push(key.clone(), entry) {
                Some((old_key, _)) if old_key != key => {
                    inner.tracker.on_evicted(&old_key);
                    inner.metrics.evictions += 1;
                    Some(old_key)
                }
                _ => None,
            };
            inner.tracker.track(key);
            inner.metrics.inserts += 1;
            evicted
        };

        // Hook runs outside the lock so it may touch the cache again
        if let (Some(key), Some(hook)) = (evicted, self.on_evict.as_ref()) {
            hook(&key);
        }
    }

    /// Fresh value for `key`, evicting it first if it has expired
    pub fn lookup<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let mut guard = self.write();
        let inner = &mut *guard;

        let expired = match inner.store.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                inner.metrics.hits += 1;
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.store.pop(key);
            inner.tracker.on_evicted(key);
            inner.metrics.expirations += 1;
            debug!("Cache entry expired on lookup");
        }
        inner.metrics.misses += 1;
        None
    }

    /// Fresh value for `key` without touching recency, counters or expiry
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let inner = self.read();
        inner
            .store
            .peek(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone())
    }

    /// Remove `key`; absent keys are ignored
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.write();
        let removed = inner.store.pop(key).map(|entry| entry.value);
        inner.tracker.on_evicted(key);
        removed
    }

    /// Drop every entry whose lifetime has run out, returning how many
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut guard = self.write();
        let inner = &mut *guard;

        let expired: Vec<K> = inner
            .store
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.store.pop(key);
            inner.tracker.on_evicted(key);
        }
        inner.metrics.expirations += expired.len() as u64;
        expired.len()
    }

    pub fn clear(&self) {
        let mut inner = self.write();
        inner.store.clear();
        inner.tracker.clear();
    }

    /// Resident entries, expired ones included
    pub fn len(&self) -> usize {
        self.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn lifetime(&self) -> chrono::Duration {
        self.lifetime
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.read().metrics.clone()
    }

    /// Keys the tracker believes are resident
    pub fn tracked_keys(&self) -> Vec<K> {
        self.read().tracker.keys().cloned().collect()
    }

    /// Keys actually held by the store
    pub fn resident_keys(&self) -> Vec<K> {
        self.read().store.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Entries reachable through the tracker, least recently used first
    pub fn snapshot(&self) -> Vec<CacheEntry<K, V>> {
        let inner = self.read();
        inner
            .store
            .iter()
            .rev()
            .filter(|(key, _)| inner.tracker.contains(*key))
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(super) fn read(&self) -> RwLockReadGuard<'_, Inner<K, V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn write(&self) -> RwLockWriteGuard<'_, Inner<K, V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for ExpiringCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_LIFETIME_SECS), DEFAULT_CAPACITY)
    }
}

impl<K: Hash + Eq, V> fmt::Debug for ExpiringCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("lifetime", &self.lifetime)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
