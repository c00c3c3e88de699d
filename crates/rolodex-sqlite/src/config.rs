//! SQLite backend configuration.

use std::path::PathBuf;

/// Connection and pragma settings for the durable store.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:` for an in-memory database.
    pub path: PathBuf,
    /// Enable WAL journaling for better read concurrency.
    pub wal_mode: bool,
    /// Enforce foreign keys.
    pub foreign_keys: bool,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout_ms: u32,
}

impl SqliteConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            wal_mode: true,
            foreign_keys: true,
            busy_timeout_ms: 5_000,
        }
    }

    /// In-memory database for testing. WAL is pointless there, so it stays
    /// off.
    pub fn memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            wal_mode: false,
            foreign_keys: true,
            busy_timeout_ms: 5_000,
        }
    }
}
