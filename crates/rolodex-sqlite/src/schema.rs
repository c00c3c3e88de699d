//! Schema management and migrations.
//!
//! One table per record kind. Each carries the uniqueness constraint on
//! `(record_id, owner)` that backs the hybrid duplicate-detection protocol,
//! and a `version` column defaulted to 0 for optimistic locking. Column
//! bounds mirror the domain validation rules.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{SqliteError, SqliteResult};

/// Schema version - increment when making schema changes.
const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations.
pub fn apply_migrations(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = get_current_version(conn)?;
    debug!(
        current_version,
        target_version = SCHEMA_VERSION,
        "checking migrations"
    );

    if current_version < SCHEMA_VERSION {
        info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "applying schema migrations"
        );
        apply_migration_v1(conn)?;
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> SqliteResult<i32> {
    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);

    Ok(version.unwrap_or(0))
}

fn record_migration(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: record tables with per-owner uniqueness and versioning.
fn apply_migration_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(SCHEMA_V1)
        .map_err(|e| SqliteError::Schema(format!("failed to apply v1 schema: {e}")))?;

    record_migration(conn, 1)?;
    info!("migration v1 applied");
    Ok(())
}

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id TEXT NOT NULL CHECK (length(record_id) BETWEEN 1 AND 10),
    owner TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT NOT NULL,
    address TEXT NOT NULL,
    UNIQUE(record_id, owner)
);

CREATE INDEX IF NOT EXISTS idx_contacts_owner ON contacts(owner);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id TEXT NOT NULL CHECK (length(record_id) BETWEEN 1 AND 10),
    owner TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    UNIQUE(record_id, owner)
);

CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id TEXT NOT NULL CHECK (length(record_id) BETWEEN 1 AND 10),
    owner TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    UNIQUE(record_id, owner)
);

CREATE INDEX IF NOT EXISTS idx_appointments_owner ON appointments(owner);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id TEXT NOT NULL CHECK (length(record_id) BETWEEN 1 AND 10),
    owner TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('ACTIVE', 'ON_HOLD', 'COMPLETED', 'ARCHIVED')),
    UNIQUE(record_id, owner)
);

CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner);
"#;
