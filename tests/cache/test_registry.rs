// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use divemeets_scraper::cache::{
    cache_file_path, CacheConfig, CacheError, CacheRegistry, CachedValue, PAGE_HTML, PROFILE_HTML,
    PROFILE_MEETS,
};
use std::sync::Arc;

fn meet_rows() -> CachedValue {
    CachedValue::Rows(vec![vec!["Spring Invitational".to_string(), "2024".to_string()]])
}

#[test]
fn test_save_all_then_load_all_in_new_registry() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CacheRegistry::new(CacheConfig::in_dir(dir.path()));

    registry.set(PROFILE_MEETS, "p1", meet_rows()).unwrap();
    registry.set(PROFILE_HTML, "p1", CachedValue::Text("<html>p1</html>".to_string())).unwrap();
    registry.set(PAGE_HTML, "e1", CachedValue::Text("<html>e1</html>".to_string())).unwrap();

    assert_eq!(registry.save_all(), 2);
    assert!(cache_file_path(dir.path(), PROFILE_MEETS).exists());
    assert!(cache_file_path(dir.path(), PROFILE_HTML).exists());
    assert!(!cache_file_path(dir.path(), PAGE_HTML).exists());

    let restarted = CacheRegistry::new(CacheConfig::in_dir(dir.path()));
    assert_eq!(restarted.load_all(), 2);
    assert_eq!(restarted.get(PROFILE_MEETS, "p1"), Some(meet_rows()));
    assert_eq!(
        restarted.get(PROFILE_HTML, "p1").and_then(CachedValue::into_text).as_deref(),
        Some("<html>p1</html>")
    );
    assert_eq!(restarted.get(PAGE_HTML, "e1"), None);
}

#[test]
fn test_load_all_keeps_handles_valid() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CacheRegistry::new(CacheConfig::in_dir(dir.path()));
    let handle = registry.cache(PROFILE_MEETS).unwrap();

    registry.set(PROFILE_MEETS, "p1", meet_rows()).unwrap();
    registry.save_all();
    registry.remove(PROFILE_MEETS, "p1");
    registry.load_all();

    assert!(Arc::ptr_eq(&handle, &registry.cache(PROFILE_MEETS).unwrap()));
    assert_eq!(handle.get("p1"), Some(meet_rows()));
}

#[test]
fn test_clear_all_removes_files_and_resets() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CacheRegistry::new(CacheConfig::in_dir(dir.path()));
    let before = registry.cache(PROFILE_MEETS).unwrap();

    registry.set(PROFILE_MEETS, "p1", meet_rows()).unwrap();
    registry.save_all();
    registry.clear_all();

    assert!(!cache_file_path(dir.path(), PROFILE_MEETS).exists());
    assert!(!cache_file_path(dir.path(), PROFILE_HTML).exists());
    assert_eq!(registry.get(PROFILE_MEETS, "p1"), None);

    let after = registry.cache(PROFILE_MEETS).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(registry.names(), vec![PAGE_HTML, PROFILE_HTML, PROFILE_MEETS]);

    // Clearing again with no files is harmless
    registry.clear_all();
}

#[test]
fn test_shape_and_name_errors() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CacheRegistry::new(CacheConfig::in_dir(dir.path()));

    let err = registry
        .set(PROFILE_MEETS, "p1", CachedValue::Text("oops".to_string()))
        .unwrap_err();
    assert!(matches!(err, CacheError::ShapeMismatch { .. }));

    let err = registry.set("nope", "k", meet_rows()).unwrap_err();
    assert!(matches!(err, CacheError::UnknownCache(name) if name == "nope"));
    assert_eq!(registry.get("nope", "k"), None);
}

#[tokio::test]
async fn test_concurrent_writers_share_registry() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(CacheRegistry::new(CacheConfig::in_dir(dir.path())));

    let mut handles = Vec::new();
    for task in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..5 {
                let key = format!("page-{}-{}", task, i);
                registry
                    .set(PAGE_HTML, &key, CachedValue::Text(key.clone()))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let page_cache = registry.cache(PAGE_HTML).unwrap();
    assert_eq!(page_cache.len(), 40);
}
