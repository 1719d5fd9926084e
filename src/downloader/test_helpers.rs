//! Shared test helpers for creating MediaDownloader instances in tests.

use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::fetcher::{FetchOutcome, MediaFetcher, ProbeOutcome};
use crate::types::{JobId, JobRecord, Resolution};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

/// Scripted fetcher: per-URL outcomes, optional latency, and call recording.
///
/// URLs without a scripted outcome probe as `"Sample"` and fetch successfully.
#[derive(Default)]
pub(crate) struct MockFetcher {
    probe_outcomes: HashMap<String, ProbeOutcome>,
    fetch_outcomes: HashMap<String, FetchOutcome>,
    delay: Duration,
    probe_calls: Mutex<Vec<String>>,
    fetch_calls: Mutex<Vec<(String, Resolution)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_probe(mut self, url: &str, outcome: ProbeOutcome) -> Self {
        self.probe_outcomes.insert(url.to_string(), outcome);
        self
    }

    pub(crate) fn with_fetch(mut self, url: &str, outcome: FetchOutcome) -> Self {
        self.fetch_outcomes.insert(url.to_string(), outcome);
        self
    }

    /// Make every call take `delay`
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn probe_calls(&self) -> Vec<String> {
        self.probe_calls.lock().unwrap().clone()
    }

    pub(crate) fn fetch_calls(&self) -> Vec<(String, Resolution)> {
        self.fetch_calls.lock().unwrap().clone()
    }

    /// Highest number of overlapping fetcher calls observed
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn probe_title(&self, url: &str) -> ProbeOutcome {
        self.probe_calls.lock().unwrap().push(url.to_string());
        self.enter().await;
        let outcome = self
            .probe_outcomes
            .get(url)
            .cloned()
            .unwrap_or_else(|| ProbeOutcome::succeeded("Sample"));
        self.leave();
        outcome
    }

    async fn fetch_media(&self, url: &str, resolution: Resolution) -> FetchOutcome {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((url.to_string(), resolution));
        self.enter().await;
        let outcome = self
            .fetch_outcomes
            .get(url)
            .cloned()
            .unwrap_or_else(FetchOutcome::succeeded);
        self.leave();
        outcome
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Config rooted in `temp_dir` with the given concurrency
pub(crate) fn test_config(temp_dir: &tempfile::TempDir, max_concurrent: usize) -> Config {
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");
    config.download.max_concurrent_downloads = max_concurrent;
    config.tools.search_path = false;
    config
}

/// Helper to create a test MediaDownloader backed by a default [`MockFetcher`].
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader() -> (MediaDownloader, tempfile::TempDir) {
    let (downloader, _fetcher, temp_dir) =
        create_test_downloader_with(MockFetcher::new(), |_| {}).await;
    (downloader, temp_dir)
}

/// Helper to create a test MediaDownloader with a scripted fetcher and config tweaks.
pub(crate) async fn create_test_downloader_with(
    fetcher: MockFetcher,
    configure: impl FnOnce(&mut Config),
) -> (MediaDownloader, Arc<MockFetcher>, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = test_config(&temp_dir, 2);
    configure(&mut config);

    let fetcher = Arc::new(fetcher);
    let downloader = MediaDownloader::with_fetcher(config, fetcher.clone())
        .await
        .unwrap();

    (downloader, fetcher, temp_dir)
}

/// Poll the store until the job reaches a terminal phase (5s limit)
pub(crate) async fn wait_for_terminal(downloader: &MediaDownloader, id: JobId) -> JobRecord {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(record) = downloader.get_job(id).await
                && record.is_terminal()
            {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not reach a terminal phase in time")
}
