// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snapshot encoding and disk persistence for [`ExpiringCache`]
//!
//! A snapshot is the bincode encoding of the ordered
//! `(key, value, expires_at)` triples reachable through the key tracker.
//! Files live at `<dir>/<name>.cache` and are replaced atomically.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::hash::Hash;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::error::CacheError;
use super::expiring::{CacheEntry, ExpiringCache};

/// Deterministic file location for a named cache
pub fn cache_file_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.cache", name))
}

/// Remove a cache file; returns false when there was nothing to remove
pub fn remove_cache_file(dir: &Path, name: &str) -> Result<bool, CacheError> {
    let path = cache_file_path(dir, name);
    match fs::remove_file(&path) {
        Ok(()) => {
            info!("Removed cache file {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No cache file to remove at {}", path.display());
            Ok(false)
        }
        Err(source) => Err(CacheError::Io { path, source }),
    }
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    /// Encode every tracked entry
    pub fn serialize(&self) -> Result<Vec<u8>, CacheError> {
        bincode::serialize(&self.snapshot()).map_err(|e| CacheError::Encode(e.to_string()))
    }

    /// Reinsert the entries of a snapshot, keeping their recorded expiry
    ///
    /// Entries whose expiry has already passed are dropped instead of being
    /// reinserted. Returns the number of entries inserted.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<usize, CacheError> {
        let entries: Vec<CacheEntry<K, V>> =
            bincode::deserialize(bytes).map_err(|e| CacheError::Decode(e.to_string()))?;

        let now = self.now();
        let mut inserted = 0;
        for entry in entries {
            if entry.is_expired_at(now) {
                continue;
            }
            self.insert_entry(entry);
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Write the snapshot to `<dir>/<name>.cache`
    pub fn save_to_disk(&self, dir: &Path, name: &str) -> Result<PathBuf, CacheError> {
        let bytes = self.serialize()?;
        let path = cache_file_path(dir, name);

        fs::create_dir_all(dir).map_err(|source| CacheError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let tmp = path.with_extension("cache.tmp");
        fs::write(&tmp, &bytes).map_err(|source| CacheError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Replace the contents with the snapshot at `<dir>/<name>.cache`
    ///
    /// A missing, unreadable or corrupt file leaves the cache empty; the
    /// problem is logged and never returned. Returns the number of entries
    /// loaded.
    pub fn load_from_disk(&self, dir: &Path, name: &str) -> usize {
        self.clear();
        let path = cache_file_path(dir, name);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No cache file at {}, starting empty", path.display());
                return 0;
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", path.display(), e);
                return 0;
            }
        };

        match self.deserialize(&bytes) {
            Ok(loaded) => {
                info!("Loaded {} entries from {}", loaded, path.display());
                loaded
            }
            Err(e) => {
                warn!("Discarding corrupt cache file {}: {}", path.display(), e);
                self.clear();
                0
            }
        }
    }

    /// Build a cache and fill it from disk
    pub fn open(dir: &Path, name: &str, lifetime: std::time::Duration, capacity: usize) -> Self {
        let cache = Self::new(lifetime, capacity);
        cache.load_from_disk(dir, name);
        cache
    }

    /// Remove the backing file; a missing file is a logged no-op
    pub fn clear_from_disk(&self, dir: &Path, name: &str) -> Result<bool, CacheError> {
        remove_cache_file(dir, name)
    }
}
