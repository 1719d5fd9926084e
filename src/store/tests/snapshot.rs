use super::*;
use std::path::PathBuf;

#[tokio::test]
async fn test_missing_snapshot_opens_empty() {
    let (store, temp_dir) = open_temp_store().await;
    assert!(store.is_empty().await);
    assert!(!temp_dir.path().join("download_status.json").exists());
}

#[tokio::test]
async fn test_malformed_snapshot_opens_empty() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("download_status.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let store = JobStore::open(path).await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_wrong_shape_snapshot_opens_empty() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("download_status.json");
    std::fs::write(&path, b"[1, 2, 3]").unwrap();

    let store = JobStore::open(path).await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_round_trip_reproduces_records_in_order() {
    let (store, _temp_dir) = open_temp_store().await;
    let now = chrono::Utc::now();

    let mut done = sample_record("https://example.com/done");
    done.begin_probe(now);
    done.begin_fetch("Sample");
    done.complete(PathBuf::from("/downloads/Sample.mp4"), now);

    let mut failed = JobRecord::new("https://example.com/failed", Resolution::Best);
    failed.begin_probe(now);
    failed.fail("network error", now);

    let pending = JobRecord::new("https://example.com/pending", Resolution::Low);

    for record in [done.clone(), failed.clone(), pending.clone()] {
        store.put(record).await;
    }

    let reloaded = JobStore::open(store.snapshot_path().to_path_buf()).await;
    assert_eq!(reloaded.list_all().await, vec![done, failed, pending]);
}

#[tokio::test]
async fn test_snapshot_is_object_keyed_by_job_id() {
    let (store, _temp_dir) = open_temp_store().await;
    let record = sample_record("https://example.com/a");
    let id = record.id;
    store.put(record).await;

    let raw = std::fs::read_to_string(store.snapshot_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json[id.to_string()];
    assert_eq!(entry["url"], "https://example.com/a");
    assert_eq!(entry["phase"], "pending");
    assert!(entry["submittedAt"].is_string(), "timestamps are stored as text");
}

#[tokio::test]
async fn test_mismatched_key_is_rejected() {
    let record = sample_record("https://example.com/a");
    let other = crate::types::JobId::new();
    let mut raw = serde_json::Map::new();
    raw.insert(other.to_string(), serde_json::to_value(&record).unwrap());
    let raw = serde_json::Value::Object(raw);

    let parsed: Result<JobTable, _> = serde_json::from_value(raw);
    assert!(parsed.is_err());
}

#[tokio::test]
async fn test_temp_file_is_not_left_behind() {
    let (store, _temp_dir) = open_temp_store().await;
    store.put(sample_record("https://example.com/a")).await;

    assert!(store.snapshot_path().exists());
    assert!(!store.snapshot_temp_path().exists());
    assert!(store.owns_path(&store.snapshot_temp_path()));
    assert!(store.owns_path(store.snapshot_path()));
}
