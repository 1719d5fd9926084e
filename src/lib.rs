//! # media-dl
//!
//! Job orchestration for fetching remote media through an external
//! command-line tool (yt-dlp).
//!
//! Clients submit a URL and get a job ID back immediately. A bounded worker
//! pool runs each job through a title probe and then the actual fetch, and
//! every state change is written through to a JSON snapshot so the job table
//! survives restarts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::{Config, MediaDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default()).await?;
//!     let _processor = downloader.start_queue_processor();
//!
//!     let (id, resolution) = downloader
//!         .submit("https://example.com/watch?v=abc", Some("hd"))
//!         .await?;
//!     println!("queued {id} at {resolution}");
//!
//!     let mut events = downloader.subscribe();
//!     while let Ok(event) = events.recv().await {
//!         println!("Event: {:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Job runner and orchestration facade
pub mod downloader;
/// Error types
pub mod error;
/// External media fetcher adapter
pub mod fetcher;
/// Job table persistence
pub mod store;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use downloader::MediaDownloader;
pub use error::{ApiError, Error, ErrorDetail, Result, StoreError, ToHttpStatus};
pub use fetcher::{CliMediaFetcher, FetchOutcome, MediaFetcher, NoOpMediaFetcher, ProbeOutcome};
pub use store::JobStore;
pub use types::{Event, JobId, JobRecord, Phase, Resolution, ResolutionOptions};

/// Wait for Ctrl+C (or SIGTERM on unix), then shut the downloader down.
///
/// Jobs still queued stay `pending` and resume on the next start; see
/// [`MediaDownloader::shutdown`].
///
/// # Example
///
/// ```no_run
/// use media_dl::{MediaDownloader, Config, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = MediaDownloader::new(Config::default()).await?;
///     let _processor = downloader.start_queue_processor();
///
///     run_with_shutdown(downloader).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: MediaDownloader) -> Result<()> {
    let signal = termination_signal().await;
    tracing::info!(signal, queued = downloader.queued_count().await, "Stopping media-dl");
    downloader.shutdown().await
}

/// Resolve with the name of the first termination signal received
///
/// A listener that cannot be installed never resolves, so the other one
/// still gets a chance.
async fn termination_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C listener unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM listener unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
