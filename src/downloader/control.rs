//! Read and maintenance operations exposed to the request layer.

use crate::error::{Error, Result};
use crate::types::{Event, JobId, JobRecord, Resolution, ResolutionOptions};

use super::MediaDownloader;

impl MediaDownloader {
    /// Copy of one job record
    pub async fn get_job(&self, id: JobId) -> Option<JobRecord> {
        self.store.get(id).await
    }

    /// Copies of every job record, in submission order
    pub async fn list_jobs(&self) -> Vec<JobRecord> {
        self.store.list_all().await
    }

    /// Remove every job record and rewrite the snapshot
    ///
    /// Downloaded files are left alone. Jobs still queued or running simply
    /// stop updating once their record is gone. Returns the number of records
    /// removed.
    pub async fn clear_history(&self) -> usize {
        let mut queue = self.queue_state.queue.lock().await;
        let cleared = self.store.clear().await;
        queue.clear();
        drop(queue);

        tracing::info!(cleared, "Job history cleared");
        self.emit_event(Event::HistoryCleared { count: cleared });
        cleared
    }

    /// Delete every file and subdirectory directly under the download directory
    ///
    /// The job table snapshot is kept. Entries that cannot be removed are
    /// logged and skipped. Returns the number of top-level entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the download directory itself cannot be listed.
    pub async fn purge_files(&self) -> Result<usize> {
        let download_dir = &self.config.download.download_dir;
        let mut entries = tokio::fs::read_dir(download_dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to list download directory '{}': {}",
                    download_dir.display(),
                    e
                ),
            ))
        })?;

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if self.store.owns_path(&path) {
                continue;
            }

            let is_dir = match entry.file_type().await {
                Ok(file_type) => file_type.is_dir(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot stat entry, skipping");
                    continue;
                }
            };

            let result = if is_dir {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };

            match result {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove entry");
                }
            }
        }

        tracing::info!(removed, download_dir = %download_dir.display(), "Download directory purged");
        self.emit_event(Event::FilesPurged { count: removed });
        Ok(removed)
    }

    /// Default resolution and every accepted resolution
    pub fn list_resolutions(&self) -> ResolutionOptions {
        ResolutionOptions {
            default: self.config.download.default_resolution,
            options: Resolution::ALL.to_vec(),
        }
    }
}
