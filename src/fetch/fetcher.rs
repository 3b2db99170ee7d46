// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP page fetching with a bounded number of requests in flight
//!
//! Every request holds a semaphore permit for its whole lifetime, so at most
//! `max_concurrent_fetches` requests run at once no matter how many callers
//! fetch concurrently. There are no retries: a failed fetch is logged once
//! and reported as absent text.

use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use super::config::FetchConfig;
use super::rate_limiter::FetchRateLimiter;

/// Page fetch error types
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// URL could not be parsed or is not http(s)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response status outside 200..300
    #[error("HTTP {status} for: {url}")]
    Status { status: u16, url: String },

    /// Body is not valid UTF-8
    #[error("Body of {url} is not UTF-8 text: {message}")]
    Decode { url: String, message: String },

    /// HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Fetches page text over HTTP GET
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    permits: Arc<Semaphore>,
    rate_limiter: Option<FetchRateLimiter>,
    config: FetchConfig,
}

impl Fetcher {
    /// Create a new fetcher
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let permits = Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1)));
        let rate_limiter = config.requests_per_minute.map(FetchRateLimiter::new);

        Ok(Self {
            client,
            permits,
            rate_limiter,
            config,
        })
    }

    /// Fetch `url` and return its body, or `None` on any failure
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        match self.try_fetch_text(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Fetch failed: {}", e);
                None
            }
        }
    }

    /// Fetch `url`, reporting why it failed
    pub async fn try_fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| FetchError::Client(e.to_string()))?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        debug!("Fetching {}", url);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let text = String::from_utf8(body.to_vec()).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(text)
    }

    /// Fetch several URLs concurrently, results in input order
    ///
    /// Concurrency is still capped by the fetcher's permit count.
    pub async fn fetch_many(&self, urls: &[String]) -> Vec<Option<String>> {
        join_all(urls.iter().map(|url| self.fetch_text(url))).await
    }

    /// Permits not currently held by an in-flight request
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
