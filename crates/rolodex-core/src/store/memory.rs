//! In-memory fallback store.
//!
//! Serves the legacy access path until a durable backend registers with the
//! [`AccessBridge`](crate::bridge::AccessBridge). All operations go through
//! `DashMap`'s atomic per-key primitives: insert-if-absent for inserts,
//! locked in-place access for replaces, conditional removal for deletes.
//! There is never a check-then-act window.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::DomainRecord;
use crate::store::{RecordStore, StoreError, StoreResult};

/// Concurrent in-process store keyed by record id.
///
/// Version checks are enforced here as well, even though the fallback path
/// is single-process, so version monotonicity holds identically across both
/// store implementations.
pub struct MemoryStore<R: DomainRecord> {
    records: DashMap<String, R>,
}

impl<R: DomainRecord> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl<R: DomainRecord> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: DomainRecord> RecordStore<R> for MemoryStore<R> {
    async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.records.contains_key(id))
    }

    async fn get(&self, id: &str) -> StoreResult<Option<R>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn get_all(&self) -> StoreResult<Vec<R>> {
        Ok(self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert(&self, mut record: R) -> StoreResult<R> {
        record.set_version(0);
        match self.records.entry(record.record_id().to_string()) {
            Entry::Occupied(entry) => Err(StoreError::Duplicate {
                id: entry.key().clone(),
            }),
            Entry::Vacant(slot) => {
                let stored = record.clone();
                slot.insert(record);
                Ok(stored)
            }
        }
    }

    async fn replace(&self, mut record: R, expected_version: i64) -> StoreResult<R> {
        let id = record.record_id().to_string();
        // get_mut holds the shard lock, so a concurrent delete cannot slip
        // in between the version check and the write.
        match self.records.get_mut(&id) {
            None => Err(StoreError::NotFound { id }),
            Some(mut entry) => {
                if entry.version() != expected_version {
                    return Err(StoreError::VersionConflict {
                        id,
                        expected: expected_version,
                    });
                }
                record.set_version(expected_version + 1);
                *entry = record.clone();
                Ok(record)
            }
        }
    }

    async fn delete(&self, id: &str, expected_version: Option<i64>) -> StoreResult<bool> {
        match expected_version {
            None => Ok(self.records.remove(id).is_some()),
            Some(expected) => {
                let removed = self
                    .records
                    .remove_if(id, |_, record| record.version() == expected);
                if removed.is_some() {
                    Ok(true)
                } else if self.records.contains_key(id) {
                    Err(StoreError::VersionConflict {
                        id: id.to_string(),
                        expected,
                    })
                } else {
                    Ok(false)
                }
            }
        }
    }

    async fn clear(&self) -> StoreResult<()> {
        self.records.clear();
        Ok(())
    }
}
