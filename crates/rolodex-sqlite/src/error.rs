//! Error types for the SQLite backend.

use rusqlite::ffi;
use thiserror::Error;

use rolodex_core::StoreError;

/// SQLite backend error type.
#[derive(Error, Debug)]
pub enum SqliteError {
    /// Database connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Schema/migration error
    #[error("schema error: {0}")]
    Schema(String),

    /// Insert of an identifier already present for this owner
    #[error("record '{0}' already exists")]
    Duplicate(String),

    /// Conditional write matched zero rows
    #[error("version conflict on record '{id}' (expected version {expected})")]
    VersionConflict { id: String, expected: i64 },

    /// Stored value that no longer satisfies the domain constraints
    #[error("corrupt row for record '{id}': {message}")]
    CorruptRow { id: String, message: String },

    /// Underlying rusqlite error
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

/// True when `err` is the `(record_id, owner)` uniqueness constraint
/// rejecting an insert; the authoritative half of the hybrid
/// duplicate-detection protocol.
///
/// Matches the UNIQUE extended result code only, so a breach of one of the
/// schema's CHECK constraints surfaces as a backend error rather than a
/// duplicate.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Connection(msg) => Self::Unavailable(msg),
            SqliteError::Schema(msg) => Self::Backend(msg),
            SqliteError::Duplicate(id) => Self::Duplicate { id },
            SqliteError::VersionConflict { id, expected } => Self::VersionConflict { id, expected },
            SqliteError::CorruptRow { id, message } => {
                Self::Backend(format!("corrupt row for record '{id}': {message}"))
            }
            SqliteError::Rusqlite(e) => Self::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn constrained_table() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (
                record_id TEXT NOT NULL CHECK (length(record_id) <= 3),
                owner TEXT NOT NULL,
                UNIQUE(record_id, owner)
            );
            INSERT INTO t (record_id, owner) VALUES ('a', 'alice');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn unique_breach_is_a_unique_violation() {
        let conn = constrained_table();
        let err = conn
            .execute("INSERT INTO t (record_id, owner) VALUES ('a', 'alice')", [])
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn check_breach_is_not_a_unique_violation() {
        let conn = constrained_table();
        let err = conn
            .execute(
                "INSERT INTO t (record_id, owner) VALUES ('too long', 'alice')",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&err));
    }
}
