//! Job submission and startup recovery.

use crate::error::{Error, Result};
use crate::types::{Event, JobId, JobRecord, Phase, Resolution};
use std::sync::atomic::Ordering;

use super::MediaDownloader;

/// Error text recorded on jobs that were mid-flight when the process stopped
pub(crate) const INTERRUPTED: &str = "interrupted by restart";

impl MediaDownloader {
    /// Submit a URL for download
    ///
    /// Creates a `pending` job record, queues it and returns immediately with
    /// the job ID and the resolution that was accepted. An unknown or missing
    /// resolution is replaced by the configured default.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the URL is missing or not an http(s) URL
    /// - [`Error::ShuttingDown`] once shutdown has begun
    /// - [`Error::QueueFull`] if `max_queue_depth` is set and reached
    pub async fn submit(&self, url: &str, resolution: Option<&str>) -> Result<(JobId, Resolution)> {
        if !self.queue_state.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let url = validate_url(url)?;
        let default = self.config.download.default_resolution;
        let accepted = Resolution::coerce(resolution, default);
        if let Some(requested) = resolution
            && requested.parse::<Resolution>().is_err()
        {
            tracing::debug!(requested, accepted = %accepted, "Unknown resolution, using default");
        }

        let record = JobRecord::new(url.clone(), accepted);
        let id = record.id;

        // Holding the queue lock across the insert keeps the depth check exact
        let mut queue = self.queue_state.queue.lock().await;
        if let Some(max_depth) = self.config.download.max_queue_depth
            && queue.len() >= max_depth
        {
            tracing::warn!(depth = queue.len(), max_depth, "Rejecting submission, queue full");
            return Err(Error::QueueFull { depth: queue.len() });
        }

        self.store.put(record).await;
        queue.push_back(id);
        drop(queue);

        tracing::info!(job_id = %id, url = %url, resolution = %accepted, "Job queued");
        self.emit_event(Event::Queued { id, url });

        Ok((id, accepted))
    }

    /// Number of jobs waiting for a worker
    pub async fn queued_count(&self) -> usize {
        self.queue_state.queue.lock().await.len()
    }

    /// Restore the queue from the loaded snapshot
    ///
    /// `pending` jobs are queued again in submission order. Jobs caught in
    /// `probing` or `fetching` are marked failed, since their external process
    /// did not survive the restart. Returns the number of requeued jobs.
    pub(crate) async fn restore_queue(&self) -> usize {
        let records = self.store.list_all().await;

        let mut requeued = 0;
        let mut interrupted = 0;
        for record in records {
            match record.phase {
                Phase::Pending => {
                    self.queue_state.queue.lock().await.push_back(record.id);
                    requeued += 1;
                }
                Phase::Probing | Phase::Fetching => {
                    let phase = record.phase;
                    let now = chrono::Utc::now();
                    if self
                        .store
                        .update(record.id, |r| r.fail(INTERRUPTED, now))
                        .await
                        .unwrap_or(false)
                    {
                        tracing::warn!(job_id = %record.id, ?phase, "Job interrupted by restart");
                        self.emit_event(Event::Failed {
                            id: record.id,
                            phase,
                            error: INTERRUPTED.to_string(),
                        });
                        interrupted += 1;
                    }
                }
                Phase::Done | Phase::Failed => {}
            }
        }

        if requeued > 0 || interrupted > 0 {
            tracing::info!(requeued, interrupted, "Restored jobs from snapshot");
        }
        requeued
    }
}

/// Trim the URL and accept it only if it parses as http or https
fn validate_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("url", "URL is required"));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::validation("url", format!("not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(Error::validation(
            "url",
            format!("unsupported scheme '{other}', expected http or https"),
        )),
    }
}
