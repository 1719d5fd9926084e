use super::*;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_put_then_get_returns_copy() {
    let (store, _temp_dir) = open_temp_store().await;
    let record = sample_record("https://example.com/a");
    let id = record.id;

    store.put(record.clone()).await;

    assert_eq!(store.get(id).await, Some(record));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_get_unknown_id_is_none() {
    let (store, _temp_dir) = open_temp_store().await;
    assert!(store.get(crate::types::JobId::new()).await.is_none());
}

#[tokio::test]
async fn test_list_all_preserves_submission_order() {
    let (store, _temp_dir) = open_temp_store().await;

    let urls = ["https://example.com/c", "https://example.com/a", "https://example.com/b"];
    let mut ids = Vec::new();
    for url in urls {
        let record = sample_record(url);
        ids.push(record.id);
        store.put(record).await;
    }

    let listed: Vec<_> = store.list_all().await.into_iter().map(|r| r.id).collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_put_existing_id_replaces_in_place() {
    let (store, _temp_dir) = open_temp_store().await;
    let first = sample_record("https://example.com/a");
    let second = sample_record("https://example.com/b");
    store.put(first.clone()).await;
    store.put(second.clone()).await;

    let mut replaced = first.clone();
    replaced.title = "Renamed".to_string();
    store.put(replaced).await;

    let listed = store.list_all().await;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id, "replacement must keep original position");
    assert_eq!(listed[0].title, "Renamed");
    assert_eq!(listed[1].id, second.id);
}

#[tokio::test]
async fn test_update_applies_closure_and_persists() {
    let (store, _temp_dir) = open_temp_store().await;
    let record = sample_record("https://example.com/a");
    let id = record.id;
    store.put(record).await;

    let applied = store
        .update(id, |r| r.begin_probe(chrono::Utc::now()))
        .await;
    assert_eq!(applied, Some(true));

    let reloaded = JobStore::open(store.snapshot_path().to_path_buf()).await;
    assert_eq!(reloaded.get(id).await.unwrap().phase, Phase::Probing);
}

#[tokio::test]
async fn test_update_without_change_skips_snapshot_write() {
    let (store, _temp_dir) = open_temp_store().await;
    let mut record = sample_record("https://example.com/a");
    record.fail("network error", chrono::Utc::now());
    let id = record.id;
    store.put(record).await;

    std::fs::remove_file(store.snapshot_path()).unwrap();

    // Terminal records ignore further transitions
    let applied = store
        .update(id, |r| r.fail("late failure", chrono::Utc::now()))
        .await;
    assert_eq!(applied, Some(false));
    assert!(!store.snapshot_path().exists(), "no-op update must not rewrite the snapshot");

    store.update(id, |r| r.title = "Renamed".to_string()).await;
    assert!(store.snapshot_path().exists());
    let reloaded = JobStore::open(store.snapshot_path().to_path_buf()).await;
    assert_eq!(reloaded.get(id).await.unwrap().error_detail, "network error");
}

#[tokio::test]
async fn test_update_unknown_id_returns_none() {
    let (store, _temp_dir) = open_temp_store().await;
    let result = store.update(crate::types::JobId::new(), |_| ()).await;
    assert!(result.is_none());
}

#[tokio::test]
async fn test_clear_empties_store_and_snapshot() {
    let (store, _temp_dir) = open_temp_store().await;
    store.put(sample_record("https://example.com/a")).await;
    store.put(sample_record("https://example.com/b")).await;

    assert_eq!(store.clear().await, 2);
    assert!(store.is_empty().await);
    assert!(store.list_all().await.is_empty());

    let reloaded = JobStore::open(store.snapshot_path().to_path_buf()).await;
    assert!(reloaded.is_empty().await);
}

#[tokio::test]
async fn test_write_failure_keeps_in_memory_state() {
    let temp_dir = tempdir().unwrap();
    // Parent directory does not exist, so every snapshot write fails
    let store = JobStore::open(temp_dir.path().join("missing").join("status.json")).await;
    let record = sample_record("https://example.com/a");
    let id = record.id;

    store.put(record).await;
    assert!(store.get(id).await.is_some());
    assert!(store.flush().await.is_err());
}

#[tokio::test]
async fn test_concurrent_updates_are_all_applied() {
    let (store, _temp_dir) = open_temp_store().await;
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let record = sample_record(&format!("https://example.com/{i}"));
            let id = record.id;
            store.put(record).await;
            store
                .update(id, |r| r.begin_fetch(format!("title {i}")))
                .await;
            id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 20, "job ids must be unique");
    let listed = store.list_all().await;
    assert_eq!(listed.len(), 20);
    assert!(listed.iter().all(|r| r.phase == Phase::Fetching && r.title.starts_with("title ")));

    let reloaded = JobStore::open(store.snapshot_path().to_path_buf()).await;
    assert_eq!(reloaded.list_all().await, listed);
}
