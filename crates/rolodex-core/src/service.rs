//! Business-facing operations over a [`RecordStore`].
//!
//! Translates store-level errors into the boolean contract callers expect:
//! duplicates and missing records are expected outcomes and come back as
//! `false`, while validation failures, exhausted optimistic-lock retries,
//! and infrastructure failures surface as errors.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{validation, DomainRecord, ValidationError};
use crate::store::{RecordStore, StoreError};

/// Bounded retry budget for optimistic-lock conflicts on update.
pub const MAX_UPDATE_ATTEMPTS: usize = 3;

/// Errors surfaced to service callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input; raised before any store access.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Sustained contention: the conditional update still conflicted after
    /// every retry attempt re-read and re-applied the change.
    #[error("update of '{id}' still conflicted after {attempts} attempts")]
    ConflictExhausted { id: String, attempts: usize },

    /// Infrastructure or backend failure propagated from the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service wrapping one record kind's store.
///
/// The store is behind `Arc<dyn RecordStore>` so the same service type works
/// over the in-memory fallback and the durable backend; the
/// [`AccessBridge`](crate::bridge::AccessBridge) swaps between them.
pub struct RecordService<R: DomainRecord> {
    store: Arc<dyn RecordStore<R>>,
}

impl<R: DomainRecord> RecordService<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self { store }
    }

    /// Adds a new record.
    ///
    /// Returns `false` when a record with the same id already exists,
    /// whether the duplicate was caught by the fast pre-check or by the
    /// storage-level constraint; the two are indistinguishable here.
    pub async fn add(&self, record: R) -> Result<bool, ServiceError> {
        match self.store.insert(record).await {
            Ok(_) => Ok(true),
            Err(StoreError::Duplicate { id }) => {
                debug!(kind = R::KIND, id = %id, "duplicate insert rejected");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Updates an existing record's mutable fields.
    ///
    /// Returns `false` when no record with that id exists. On a version
    /// conflict the current record is re-read, the patch re-applied, and the
    /// conditional replace retried up to [`MAX_UPDATE_ATTEMPTS`] times; only
    /// sustained contention is surfaced as an error.
    pub async fn update(&self, id: &str, patch: &R::Patch) -> Result<bool, ServiceError> {
        let id = validation::validate_not_blank(id, R::ID_FIELD)?;

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let Some(mut current) = self.store.get(&id).await? else {
                // Also the no-resurrection path: a concurrent delete makes
                // the retry re-read come back empty instead of re-inserting.
                return Ok(false);
            };
            let expected = current.version();
            current.apply(patch)?;

            match self.store.replace(current, expected).await {
                Ok(_) => return Ok(true),
                Err(StoreError::NotFound { .. }) => return Ok(false),
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(kind = R::KIND, id = %id, attempt, "version conflict, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            kind = R::KIND,
            id = %id,
            attempts = MAX_UPDATE_ATTEMPTS,
            "optimistic-lock retries exhausted"
        );
        Err(ServiceError::ConflictExhausted {
            id,
            attempts: MAX_UPDATE_ATTEMPTS,
        })
    }

    /// Deletes a record by id. Returns `false` when no record existed.
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let id = validation::validate_not_blank(id, R::ID_FIELD)?;
        Ok(self.store.delete(&id, None).await?)
    }

    /// Returns a defensive copy of the record, if present.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<R>, ServiceError> {
        let id = validation::validate_not_blank(id, R::ID_FIELD)?;
        Ok(self.store.get(&id).await?)
    }

    /// Returns defensive copies of all records; a point-in-time snapshot
    /// taken without locking.
    pub async fn get_all(&self) -> Result<Vec<R>, ServiceError> {
        Ok(self.store.get_all().await?)
    }

    /// Removes every record. Test/administrative use only.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        Ok(self.store.clear().await?)
    }
}
