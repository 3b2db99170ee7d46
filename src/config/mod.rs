// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Application configuration
//!
//! Every subsystem has its own config struct with `Default`, `from_env()`
//! and `validate()`. [`AppConfig`] bundles them for the binary.

use std::env;

use crate::cache::CacheConfig;
use crate::fetch::FetchConfig;
use crate::parse::DEFAULT_JUDGE_SCORE_STYLE;

/// Base path relative links on the results site resolve against
pub const DEFAULT_BASE_URL: &str = "https://secure.meetcontrol.com/divemeets/system/";

/// Layout facts about the results site
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Prefix for relative hrefs, ends with `/`
    pub base_url: String,
    /// Inline style marking judge score cells
    pub judge_score_style: String,
}

impl SiteConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("DIVEMEETS_BASE_URL")
                .map(|url| with_trailing_slash(&url))
                .unwrap_or(defaults.base_url),
            judge_score_style: env::var("DIVEMEETS_JUDGE_SCORE_STYLE")
                .unwrap_or(defaults.judge_score_style),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("base_url must be an http(s) URL: {}", self.base_url));
        }
        if self.judge_score_style.trim().is_empty() {
            return Err("judge_score_style must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            judge_score_style: DEFAULT_JUDGE_SCORE_STYLE.to_string(),
        }
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Configuration for the whole scraper
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            site: SiteConfig::from_env(),
            fetch: FetchConfig::from_env(),
            cache: CacheConfig::from_env(),
        }
    }

    /// Validate every section, naming the one that failed
    pub fn validate(&self) -> Result<(), String> {
        self.site.validate().map_err(|e| format!("site: {}", e))?;
        self.fetch.validate().map_err(|e| format!("fetch: {}", e))?;
        self.cache.validate().map_err(|e| format!("cache: {}", e))?;
        Ok(())
    }
}
