// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Expiring caches and the named-cache registry
//!
//! ## Architecture
//!
//! ```text
//! CacheRegistry ── "profileMeets" → NamedCache::ProfileMeets(ExpiringCache<String, Vec<Vec<String>>>)
//!               ├─ "profileHTML"  → NamedCache::ProfileHtml(ExpiringCache<String, String>)
//!               └─ "pageHTML"     → NamedCache::PageHtml(ExpiringCache<String, String>)   (memory only)
//!
//! ExpiringCache = LruCache (capacity) + KeyTracker (serialization) + Clock (expiry)
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod expiring;
pub mod persist;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{default_cache_dir, CacheConfig};
pub use error::CacheError;
pub use expiring::{CacheEntry, CacheMetrics, EvictionHook, ExpiringCache, KeyTracker};
pub use persist::{cache_file_path, remove_cache_file};
pub use registry::{
    CacheRegistry, CachedValue, MeetRows, NamedCache, NamedCacheStats, PAGE_HTML, PROFILE_HTML,
    PROFILE_MEETS,
};
