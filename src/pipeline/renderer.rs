// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page renderer boundary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::fetch::Fetcher;

/// Final HTML of a page together with the URL it was rendered from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

impl RenderedPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Source of rendered page HTML
///
/// The pipeline only needs the final document body. Whether it came from a
/// plain GET or a scripted browser session is up to the implementation.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render `url`, or `None` if the page could not be obtained
    async fn render(&self, url: &str) -> Option<RenderedPage>;

    /// Renderer name for logging
    fn name(&self) -> &'static str;
}

/// Renders pages with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    fetcher: Arc<Fetcher>,
}

impl HttpRenderer {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Arc<Fetcher> {
        &self.fetcher
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Option<RenderedPage> {
        self.fetcher
            .fetch_text(url)
            .await
            .map(|html| RenderedPage::new(url, html))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
