// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use divemeets_scraper::cache::{CacheConfig, CacheRegistry, PROFILE_HTML, PROFILE_MEETS};
use divemeets_scraper::config::AppConfig;
use divemeets_scraper::parse::{PageKind, StructuredResult};
use divemeets_scraper::pipeline::{Pipeline, RenderedPage};
use divemeets_scraper::store::{InMemoryMeetStore, MeetStore};
use std::sync::Arc;

use super::support::{spawn_site, PROFILE_PAGE};

fn pipeline_in(dir: &std::path::Path) -> Pipeline {
    let config = AppConfig {
        cache: CacheConfig::in_dir(dir),
        ..AppConfig::default()
    };
    let registry = Arc::new(CacheRegistry::new(config.cache.clone()));
    Pipeline::from_config(&config, registry).unwrap()
}

#[tokio::test]
async fn test_profile_meets_fetched_once() {
    let site = spawn_site().await;
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path());
    let url = site.url("/profile");

    let first = pipeline.process(&url, PageKind::ProfileMeets).await.unwrap();
    let second = pipeline.process(&url, PageKind::ProfileMeets).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(site.hits.profile(), 1);
    assert!(pipeline.registry().get(PROFILE_MEETS, &url).is_some());
    assert!(pipeline.registry().get(PROFILE_HTML, &url).is_some());
}

#[tokio::test]
async fn test_profile_cache_survives_restart() {
    let site = spawn_site().await;
    let dir = tempfile::tempdir().unwrap();
    let url = site.url("/profile");

    let pipeline = pipeline_in(dir.path());
    pipeline.profile_meets(&url).await.unwrap();
    assert_eq!(pipeline.registry().save_all(), 2);

    let restarted = pipeline_in(dir.path());
    restarted.registry().load_all();
    let rows = restarted.profile_meets(&url).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(site.hits.profile(), 1);
}

#[tokio::test]
async fn test_unreachable_pages_are_absent() {
    let site = spawn_site().await;
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path());

    let urls = vec![site.url("/missing"), site.url("/profile")];
    let results = pipeline.scrape_many(&urls, PageKind::ProfileMeets).await;

    assert!(results[0].is_none());
    assert!(matches!(&results[1], Some(StructuredResult::ProfileMeets(rows)) if rows.len() == 3));
    assert!(pipeline.entries(&site.url("/missing")).await.is_none());
}

#[tokio::test]
async fn test_rendered_page_to_meet_store() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_in(dir.path());
    let store = InMemoryMeetStore::new();

    let page = RenderedPage::new("https://example.org/profile", PROFILE_PAGE);
    let Some(StructuredResult::ProfileMeets(rows)) = pipeline.process_rendered(&page, PageKind::ProfileMeets) else {
        panic!("expected profile meets");
    };

    assert_eq!(pipeline.record_meets(&store, &rows).await, 2);
    assert_eq!(pipeline.record_meets(&store, &rows).await, 0);

    let names: Vec<String> = store.all().await.into_iter().filter_map(|m| m.name).collect();
    assert_eq!(names, vec!["Spring Invitational", "Summer Open"]);
}
