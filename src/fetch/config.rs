// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for page fetching
//!
//! Defines timeouts, the concurrency bound and optional pacing.

use std::env;

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout per request in seconds (default: 15)
    pub timeout_secs: u64,
    /// Maximum fetches in flight at once (default: 4)
    pub max_concurrent_fetches: usize,
    /// Optional pacing, requests per minute (default: none)
    pub requests_per_minute: Option<u32>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: env::var("DIVEMEETS_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            max_concurrent_fetches: env::var("DIVEMEETS_FETCH_MAX_CONCURRENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_fetches)
                .clamp(1, 32),
            requests_per_minute: env::var("DIVEMEETS_FETCH_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|rpm: &u32| *rpm > 0),
            user_agent: env::var("DIVEMEETS_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.max_concurrent_fetches == 0 {
            return Err("max_concurrent_fetches must be at least 1".to_string());
        }
        if self.requests_per_minute == Some(0) {
            return Err("requests_per_minute must be at least 1 when set".to_string());
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_concurrent_fetches: 4,
            requests_per_minute: None,
            user_agent: format!("divemeets-scraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
