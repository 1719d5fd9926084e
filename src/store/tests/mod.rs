use super::*;
use crate::types::{JobRecord, Phase, Resolution};
use tempfile::tempdir;

mod jobs;
mod snapshot;

/// Open a store whose snapshot lives in a fresh temp dir
async fn open_temp_store() -> (JobStore, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let store = JobStore::open(temp_dir.path().join("download_status.json")).await;
    (store, temp_dir)
}

fn sample_record(url: &str) -> JobRecord {
    JobRecord::new(url, Resolution::Medium)
}
