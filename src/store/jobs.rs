//! Job record CRUD operations.

use crate::types::{JobId, JobRecord};

use super::JobStore;

impl JobStore {
    /// Insert or replace a record and persist the table
    pub async fn put(&self, record: JobRecord) {
        let mut table = self.table.lock().await;
        let id = record.id;
        if !table.insert(record) {
            tracing::debug!(job_id = %id, "Replaced existing job record");
        }
        self.persist(&table).await;
    }

    /// Copy of one record
    pub async fn get(&self, id: JobId) -> Option<JobRecord> {
        let table = self.table.lock().await;
        table.get(&id).cloned()
    }

    /// Copies of every record, in submission order
    pub async fn list_all(&self) -> Vec<JobRecord> {
        let table = self.table.lock().await;
        table.iter().cloned().collect()
    }

    /// Apply `f` to one record under the lock and persist the table if the
    /// record changed
    ///
    /// Returns `None` (and persists nothing) if the record does not exist.
    /// `f` must not block; it runs with the store locked.
    pub async fn update<R>(&self, id: JobId, f: impl FnOnce(&mut JobRecord) -> R) -> Option<R> {
        let mut table = self.table.lock().await;
        let record = table.get_mut(&id)?;
        let before = record.clone();
        let result = f(record);
        if *record != before {
            self.persist(&table).await;
        }
        Some(result)
    }

    /// Remove every record, persist the empty table, and return how many were removed
    pub async fn clear(&self) -> usize {
        let mut table = self.table.lock().await;
        let removed = table.clear();
        self.persist(&table).await;
        removed
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
