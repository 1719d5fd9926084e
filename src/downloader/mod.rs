//! Core downloader implementation split into focused submodules.
//!
//! The `MediaDownloader` struct and its methods are organized by domain:
//! - [`queue`] - Job submission and startup recovery
//! - [`queue_processor`] - Bounded worker pool feeding the job task
//! - [`job_task`] - Probe-then-fetch workflow for a single job
//! - [`control`] - Read and maintenance operations (status, history, purge)
//! - [`lifecycle`] - Shutdown coordination

mod control;
mod job_task;
mod lifecycle;
mod queue;
mod queue_processor;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::{CliMediaFetcher, MediaFetcher, NoOpMediaFetcher};
use crate::store::JobStore;
use crate::types::{Event, JobId};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::{Mutex, Semaphore, broadcast};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Queue and job execution state
#[derive(Clone)]
pub(crate) struct QueueState {
    /// FIFO of job IDs waiting for a worker
    pub(crate) queue: Arc<Mutex<VecDeque<JobId>>>,
    /// Semaphore bounding in-flight jobs (respects max_concurrent_downloads config)
    pub(crate) concurrent_limit: Arc<Semaphore>,
    /// Jobs currently running probe or fetch
    pub(crate) active_jobs: Arc<Mutex<HashSet<JobId>>>,
    /// Flag to indicate whether new jobs are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<AtomicBool>,
}

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// Owns the job table, the work queue and the fetcher. Call
/// [`start_queue_processor`](MediaDownloader::start_queue_processor) once to
/// begin executing submitted jobs.
#[derive(Clone)]
pub struct MediaDownloader {
    /// Job table and its durable snapshot
    /// Public for integration tests to inspect job records
    pub store: Arc<JobStore>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Configuration with an absolute download directory
    pub(crate) config: Arc<Config>,
    /// External media fetcher (trait object for pluggable implementations)
    pub(crate) fetcher: Arc<dyn MediaFetcher>,
    /// Queue and job execution state
    pub(crate) queue_state: QueueState,
}

impl MediaDownloader {
    /// Create a new MediaDownloader instance
    ///
    /// This initializes all core components:
    /// - Validates the config and creates the download directory
    /// - Picks the fetcher (configured yt-dlp path, PATH lookup, or a no-op fallback)
    /// - Loads the job table snapshot
    /// - Requeues pending jobs and fails jobs interrupted by the previous shutdown
    ///
    /// # Errors
    ///
    /// [`Error::Config`] or [`Error::Io`] for an unusable config or download
    /// directory, and [`Error::ExternalTool`] if `tools.ytdlp_path` is set but
    /// is not an existing file.
    pub async fn new(config: Config) -> Result<Self> {
        let config = prepare_config(config).await?;

        let fetcher: Arc<dyn MediaFetcher> = if let Some(ref ytdlp_path) = config.tools.ytdlp_path
        {
            let is_file = tokio::fs::metadata(ytdlp_path)
                .await
                .is_ok_and(|m| m.is_file());
            if !is_file {
                return Err(Error::ExternalTool(format!(
                    "configured yt-dlp not found at {}",
                    ytdlp_path.display()
                )));
            }
            Arc::new(CliMediaFetcher::new(
                ytdlp_path.clone(),
                config.download.download_dir.clone(),
            ))
        } else if config.tools.search_path {
            CliMediaFetcher::from_path(config.download.download_dir.clone())
                .map(|f| Arc::new(f) as Arc<dyn MediaFetcher>)
                .unwrap_or_else(|| Arc::new(NoOpMediaFetcher))
        } else {
            Arc::new(NoOpMediaFetcher)
        };

        if fetcher.name() == NoOpMediaFetcher.name() {
            tracing::warn!("yt-dlp not found, every job will fail until it is installed");
        }

        Self::build(config, fetcher).await
    }

    /// Create a MediaDownloader that uses the given fetcher instead of discovering one
    pub async fn with_fetcher(config: Config, fetcher: Arc<dyn MediaFetcher>) -> Result<Self> {
        let config = prepare_config(config).await?;
        Self::build(config, fetcher).await
    }

    async fn build(config: Config, fetcher: Arc<dyn MediaFetcher>) -> Result<Self> {
        tracing::info!(
            fetcher = fetcher.name(),
            download_dir = %config.download.download_dir.display(),
            max_concurrent = config.download.max_concurrent_downloads,
            "Media fetcher initialized"
        );

        let store = Arc::new(JobStore::open(config.snapshot_path()).await);

        // Buffered so slow subscribers only lag instead of blocking workers
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let queue_state = QueueState {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            concurrent_limit: Arc::new(Semaphore::new(config.download.max_concurrent_downloads)),
            active_jobs: Arc::new(Mutex::new(HashSet::new())),
            accepting_new: Arc::new(AtomicBool::new(true)),
        };

        let downloader = Self {
            store,
            event_tx,
            config: Arc::new(config),
            fetcher,
            queue_state,
        };

        downloader.restore_queue().await;

        Ok(downloader)
    }

    /// Subscribe to job events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// A subscriber that falls behind by more than 1000 events receives
    /// `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use media_dl::{MediaDownloader, Config};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let downloader = MediaDownloader::new(Config::default()).await?;
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             tracing::info!(?event, "job event");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Name of the fetcher in use (e.g. `cli-yt-dlp` or `noop`)
    pub fn fetcher_name(&self) -> &'static str {
        self.fetcher.name()
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server listens on `server.api.bind_address` (default 127.0.0.1:3000).
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}

/// Validate the config, make the download directory absolute and create it
async fn prepare_config(mut config: Config) -> Result<Config> {
    config.validate()?;

    let download_dir = std::path::absolute(&config.download.download_dir).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!(
                "Failed to resolve download directory '{}': {}",
                config.download.download_dir.display(),
                e
            ),
        ))
    })?;

    tokio::fs::create_dir_all(&download_dir).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!(
                "Failed to create download directory '{}': {}",
                download_dir.display(),
                e
            ),
        ))
    })?;

    config.download.download_dir = download_dir;
    Ok(config)
}
