//! Shutdown coordination.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::error::Result;
use crate::types::Event;

use super::MediaDownloader;

/// How long shutdown waits for in-flight jobs
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting for in-flight jobs
const ACTIVE_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl MediaDownloader {
    /// Gracefully shut down the downloader
    ///
    /// This method performs a graceful shutdown sequence:
    /// 1. Stops accepting submissions and starting queued jobs
    /// 2. Waits up to 30 seconds for in-flight jobs to reach a terminal phase
    /// 3. Flushes the job table snapshot
    /// 4. Emits [`Event::Shutdown`]
    ///
    /// Jobs still queued keep their `pending` record and run on the next start.
    /// Jobs that outlive the timeout are failed as interrupted on the next start.
    ///
    /// # Errors
    ///
    /// Currently always succeeds; a failed final flush is logged.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.queue_state.accepting_new.store(false, Ordering::SeqCst);
        tracing::info!("Stopped accepting new jobs");

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.wait_for_active_jobs()).await {
            Ok(()) => tracing::info!("All in-flight jobs finished"),
            Err(_) => {
                let remaining = self.queue_state.active_jobs.lock().await.len();
                tracing::warn!(
                    remaining,
                    "Timeout waiting for in-flight jobs, proceeding with shutdown"
                );
            }
        }

        if let Err(e) = self.store.flush().await {
            tracing::error!(error = %e, "Failed to flush job table during shutdown");
        }

        self.emit_event(Event::Shutdown);
        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Whether shutdown has begun
    pub fn is_shutting_down(&self) -> bool {
        !self.queue_state.accepting_new.load(Ordering::SeqCst)
    }

    async fn wait_for_active_jobs(&self) {
        loop {
            let active_count = self.queue_state.active_jobs.lock().await.len();
            if active_count == 0 {
                return;
            }

            tracing::debug!(active_count, "Waiting for in-flight jobs to finish");
            tokio::time::sleep(ACTIVE_POLL_INTERVAL).await;
        }
    }
}
