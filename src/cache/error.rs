// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by cache persistence and the registry
#[derive(Debug, Error)]
pub enum CacheError {
    /// Payload on disk (or in memory) is not a valid cache snapshot
    #[error("Cache payload could not be decoded: {0}")]
    Decode(String),

    /// Snapshot could not be encoded
    #[error("Cache payload could not be encoded: {0}")]
    Encode(String),

    /// Reading, writing or removing a cache file failed
    #[error("Cache file error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No cache registered under this name
    #[error("No cache registered as '{0}'")]
    UnknownCache(String),

    /// Value shape does not fit the named cache
    #[error("Cache '{name}' does not hold {shape} values")]
    ShapeMismatch { name: String, shape: &'static str },
}
