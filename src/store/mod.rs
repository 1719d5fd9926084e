//! Job table persistence for media-dl
//!
//! [`JobStore`] owns the in-memory job table and its durable JSON snapshot.
//! Every operation takes the same lock, and every mutation rewrites the
//! snapshot before the lock is released, so the file on disk always reflects
//! the mutations in the order they happened.
//!
//! Durability is best-effort: a failed snapshot write is logged and the
//! in-memory table stays authoritative for the rest of the process lifetime.
//!
//! ## Submodules
//!
//! - [`jobs`] - record CRUD (`put`, `get`, `update`, `list_all`, `clear`)
//! - [`snapshot`] - on-disk format and load/write helpers

use crate::error::StoreError;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

mod jobs;
mod snapshot;

use snapshot::JobTable;

/// Suffix of the temporary file a snapshot is written to before the rename
const TEMP_SUFFIX: &str = ".tmp";

/// In-memory job table mirrored to a JSON snapshot file
#[derive(Debug)]
pub struct JobStore {
    table: Mutex<JobTable>,
    snapshot_path: PathBuf,
}

impl JobStore {
    /// Open the store backed by `snapshot_path`
    ///
    /// Loads the existing snapshot if there is one. A missing, unreadable or
    /// malformed snapshot yields an empty store; opening never fails.
    pub async fn open(snapshot_path: impl Into<PathBuf>) -> Self {
        let snapshot_path = snapshot_path.into();

        let table = match snapshot::read(&snapshot_path).await {
            Ok(Some(table)) => {
                tracing::info!(
                    path = %snapshot_path.display(),
                    jobs = table.len(),
                    "Loaded job table snapshot"
                );
                table
            }
            Ok(None) => {
                tracing::info!(
                    path = %snapshot_path.display(),
                    "No job table snapshot found, starting empty"
                );
                JobTable::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unusable job table snapshot, starting empty");
                JobTable::default()
            }
        };

        Self {
            table: Mutex::new(table),
            snapshot_path,
        }
    }

    /// Path of the durable snapshot
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Path the snapshot is staged at before being renamed into place
    pub fn snapshot_temp_path(&self) -> PathBuf {
        let mut name = self
            .snapshot_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(TEMP_SUFFIX);
        self.snapshot_path.with_file_name(name)
    }

    /// Whether `path` is one of the files the store writes
    pub fn owns_path(&self, path: &Path) -> bool {
        path == self.snapshot_path || path == self.snapshot_temp_path()
    }

    /// Write the table to disk, logging (not returning) any failure
    async fn persist(&self, table: &JobTable) {
        if let Err(e) = snapshot::write(&self.snapshot_path, &self.snapshot_temp_path(), table).await
        {
            tracing::error!(error = %e, "Failed to persist job table snapshot");
        }
    }

    /// Write the current table to disk and report the outcome
    ///
    /// Normal mutations persist on their own; this is for callers that need to
    /// know whether the snapshot is current (e.g. at shutdown).
    pub async fn flush(&self) -> Result<(), StoreError> {
        let table = self.table.lock().await;
        snapshot::write(&self.snapshot_path, &self.snapshot_temp_path(), &table).await
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
