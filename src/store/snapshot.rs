//! Snapshot format: a JSON object mapping job ID to its full record, written
//! in submission order.

use crate::error::StoreError;
use crate::types::{JobId, JobRecord};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Job records keyed by ID, remembering insertion order
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct JobTable {
    records: HashMap<JobId, JobRecord>,
    order: Vec<JobId>,
}

impl JobTable {
    /// Insert or replace a record. Returns true if the ID was new.
    pub(crate) fn insert(&mut self, record: JobRecord) -> bool {
        let id = record.id;
        let is_new = self.records.insert(id, record).is_none();
        if is_new {
            self.order.push(id);
        }
        is_new
    }

    pub(crate) fn get(&self, id: &JobId) -> Option<&JobRecord> {
        self.records.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &JobId) -> Option<&mut JobRecord> {
        self.records.get_mut(id)
    }

    /// Records in insertion order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &JobRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Remove everything, returning how many records were dropped
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.order.len();
        self.records.clear();
        self.order.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

impl Serialize for JobTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for record in self.iter() {
            map.serialize_entry(&record.id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JobTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = JobTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of job id to job record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JobTable, A::Error> {
                let mut table = JobTable::default();
                while let Some((id, record)) = map.next_entry::<JobId, JobRecord>()? {
                    if record.id != id {
                        return Err(de::Error::custom(format!(
                            "record {} stored under key {}",
                            record.id, id
                        )));
                    }
                    table.insert(record);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Read the snapshot at `path`. `Ok(None)` if the file does not exist.
pub(crate) async fn read(path: &Path) -> Result<Option<JobTable>, StoreError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Overwrite the snapshot at `path` by staging it at `temp_path` and renaming
pub(crate) async fn write(
    path: &Path,
    temp_path: &Path,
    table: &JobTable,
) -> Result<(), StoreError> {
    let write_err = |reason: String| StoreError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = serde_json::to_vec_pretty(table).map_err(|e| write_err(e.to_string()))?;
    tokio::fs::write(temp_path, &bytes)
        .await
        .map_err(|e| write_err(e.to_string()))?;
    tokio::fs::rename(temp_path, path)
        .await
        .map_err(|e| write_err(e.to_string()))?;

    tracing::trace!(path = %path.display(), jobs = table.len(), "Job table snapshot written");
    Ok(())
}
