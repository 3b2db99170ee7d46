// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use divemeets_scraper::fetch::{FetchConfig, FetchError, Fetcher};

use super::support::spawn_site;

fn fetcher(max_concurrent: usize) -> Fetcher {
    Fetcher::new(FetchConfig {
        timeout_secs: 5,
        max_concurrent_fetches: max_concurrent,
        ..FetchConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_success_returns_body() {
    let site = spawn_site().await;
    let text = fetcher(4).fetch_text(&site.url("/text")).await;
    assert_eq!(text.as_deref(), Some("plain body"));
}

#[tokio::test]
async fn test_non_success_status_is_none() {
    let site = spawn_site().await;
    let fetcher = fetcher(4);

    assert!(fetcher.fetch_text(&site.url("/missing")).await.is_none());
    assert!(fetcher.fetch_text(&site.url("/error")).await.is_none());

    let err = fetcher.try_fetch_text(&site.url("/missing")).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_non_utf8_body_is_none() {
    let site = spawn_site().await;
    let fetcher = fetcher(4);

    assert!(fetcher.fetch_text(&site.url("/binary")).await.is_none());
    let err = fetcher.try_fetch_text(&site.url("/binary")).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_fetch_many_respects_concurrency_bound() {
    let site = spawn_site().await;
    let fetcher = fetcher(2);

    let urls: Vec<String> = (0..6).map(|_| site.url("/slow")).collect();
    let results = fetcher.fetch_many(&urls).await;

    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| r.as_deref() == Some("done")));
    assert!(site.hits.peak() <= 2, "peak concurrency was {}", site.hits.peak());
    assert_eq!(fetcher.available_permits(), 2);
}

#[tokio::test]
async fn test_fetch_many_keeps_input_order() {
    let site = spawn_site().await;
    let urls = vec![site.url("/missing"), site.url("/text"), site.url("/binary")];

    let results = fetcher(4).fetch_many(&urls).await;
    assert_eq!(results, vec![None, Some("plain body".to_string()), None]);
}
