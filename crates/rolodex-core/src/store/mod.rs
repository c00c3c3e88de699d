//! Storage abstraction over one record kind.
//!
//! The trait lives here, in the core crate, so backends depend on the domain
//! and never the reverse. Two implementations exist: [`MemoryStore`] (the
//! in-process fallback used before a durable backend is wired) and the
//! SQLite-backed store in `rolodex-sqlite`.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DomainRecord;

/// Common result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors.
///
/// `Duplicate` and `NotFound` are expected business outcomes; the service
/// layer maps them to boolean results instead of surfacing them to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Insert of an identifier that is already present.
    #[error("record '{id}' already exists")]
    Duplicate { id: String },

    /// Replace or delete of an identifier that is not present.
    #[error("record '{id}' not found")]
    NotFound { id: String },

    /// The record's stored version no longer matches the caller's expected
    /// version, or the record disappeared between read and write. The store
    /// cannot tell these apart without a follow-up read; callers re-read to
    /// disambiguate.
    #[error("version conflict on record '{id}' (expected version {expected})")]
    VersionConflict { id: String, expected: i64 },

    /// The durable backend is unreachable. Not retried at this layer.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// CRUD surface over a collection of records keyed by identifier.
///
/// Contract:
/// - every mutation is atomic from the caller's perspective
/// - reads return owned defensive copies, never references into internal
///   state
/// - identifiers are unique within a store (and its owning principal, where
///   the backend is multi-tenant)
#[async_trait]
pub trait RecordStore<R: DomainRecord>: Send + Sync {
    /// Fast existence probe; used as the cheap-rejection half of the hybrid
    /// duplicate-detection protocol.
    async fn exists(&self, id: &str) -> StoreResult<bool>;

    /// Returns a defensive copy of the record, if present.
    async fn get(&self, id: &str) -> StoreResult<Option<R>>;

    /// Returns defensive copies of all records.
    async fn get_all(&self) -> StoreResult<Vec<R>>;

    /// Inserts a new record at version 0.
    ///
    /// Implementations must use an atomic insert-if-absent primitive (or a
    /// storage-level uniqueness constraint), never a separate
    /// check-then-insert, so two racing inserts of the same id cannot both
    /// succeed. Returns the stored copy.
    async fn insert(&self, record: R) -> StoreResult<R>;

    /// Replaces the stored record if its current version equals
    /// `expected_version`, bumping the version by exactly 1.
    ///
    /// Returns the stored copy on success.
    async fn replace(&self, record: R, expected_version: i64) -> StoreResult<R>;

    /// Deletes by id. With `expected_version`, the delete is conditional on
    /// the stored version and reports [`StoreError::VersionConflict`] when a
    /// concurrent writer moved it. Returns `false` when no record existed.
    async fn delete(&self, id: &str, expected_version: Option<i64>) -> StoreResult<bool>;

    /// Removes every record. Test/administrative use only.
    async fn clear(&self) -> StoreResult<()>;
}
