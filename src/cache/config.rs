// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the expiring caches

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default entry lifetime: 12 hours
pub const DEFAULT_LIFETIME_SECS: u64 = 12 * 60 * 60;

/// Longest accepted entry lifetime: 100 years
pub const MAX_LIFETIME_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Default maximum number of resident entries per cache
pub const DEFAULT_CAPACITY: usize = 50;

/// Settings shared by every cache in the registry
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (default: 43200 = 12 hours)
    pub lifetime_secs: u64,
    /// Maximum entries per cache before LRU eviction (default: 50)
    pub capacity: usize,
    /// Directory holding `<name>.cache` files
    pub cache_dir: PathBuf,
}

impl CacheConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            lifetime_secs: env::var("DIVEMEETS_CACHE_LIFETIME_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LIFETIME_SECS),
            capacity: env::var("DIVEMEETS_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            cache_dir: env::var("DIVEMEETS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_cache_dir()),
        }
    }

    /// Same settings, different directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.lifetime_secs == 0 {
            return Err("lifetime_secs must be at least 1".to_string());
        }
        if self.lifetime_secs > MAX_LIFETIME_SECS {
            return Err(format!("lifetime_secs must be at most {}", MAX_LIFETIME_SECS));
        }
        if self.capacity == 0 {
            return Err("capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lifetime_secs: DEFAULT_LIFETIME_SECS,
            capacity: DEFAULT_CAPACITY,
            cache_dir: default_cache_dir(),
        }
    }
}

/// Platform cache directory, e.g. `~/.cache/divemeets` on Linux
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("divemeets")
}
