//! SQLite-backed durable store for rolodex.
//!
//! Implements `rolodex_core`'s `RecordStore` over one table per record
//! kind, with:
//!
//! - a `(record_id, owner)` uniqueness constraint backing the hybrid
//!   duplicate-detection protocol (fast pre-check, constraint as the
//!   authoritative guard, one indistinguishable error either way)
//! - a `version` column enforced on every conditional update/delete for
//!   optimistic locking
//! - WAL mode and an `Arc<Mutex<Connection>>` wrapper, with all blocking
//!   calls dispatched through `spawn_blocking`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rolodex_core::{Contact, RecordService, register_contact_service};
//! use rolodex_sqlite::{SqliteConfig, SqlitePool, SqliteStore};
//!
//! let pool = SqlitePool::new(SqliteConfig::new("./rolodex.db"))?;
//! let store: SqliteStore<Contact> = SqliteStore::new(pool, "alice");
//! let service = Arc::new(RecordService::new(Arc::new(store)));
//! // Make the durable service authoritative for legacy callers too.
//! register_contact_service(service).await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod records;
pub mod schema;
pub mod store;

// Re-exports
pub use config::SqliteConfig;
pub use connection::SqlitePool;
pub use error::{SqliteError, SqliteResult};
pub use records::SqlRecord;
pub use store::SqliteStore;
