//! Durable [`RecordStore`] implementation.
//!
//! One generic store over the per-kind [`SqlRecord`] mapping. Each store is
//! scoped to a single owning principal; the uniqueness constraint on
//! `(record_id, owner)` is the authoritative duplicate guard, and every
//! conditional write carries the expected version in its `WHERE` clause.

use std::marker::PhantomData;

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use rolodex_core::{RecordStore, StoreError, StoreResult};

use crate::connection::SqlitePool;
use crate::error::{is_unique_violation, SqliteError, SqliteResult};
use crate::records::SqlRecord;

/// SQLite-backed store for one record kind, scoped to one owner.
#[derive(Clone)]
pub struct SqliteStore<R: SqlRecord> {
    pool: SqlitePool,
    owner: String,
    _marker: PhantomData<fn() -> R>,
}

impl<R: SqlRecord> SqliteStore<R> {
    pub fn new(pool: SqlitePool, owner: impl Into<String>) -> Self {
        Self {
            pool,
            owner: owner.into(),
            _marker: PhantomData,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Runs a blocking closure against the connection on the blocking pool.
    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> SqliteResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let owner = self.owner.clone();
        tokio::task::spawn_blocking(move || pool.with_connection(|conn| f(conn, &owner)))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map_err(Into::into)
    }
}

fn row_exists(conn: &Connection, table: &str, id: &str, owner: &str) -> SqliteResult<bool> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE record_id = ?1 AND owner = ?2");
    let count: i64 = conn.query_row(&sql, params![id, owner], |row| row.get(0))?;
    Ok(count > 0)
}

fn select_sql<R: SqlRecord>() -> String {
    format!(
        "SELECT record_id, version, {} FROM {} WHERE record_id = ?1 AND owner = ?2",
        R::FIELD_COLUMNS.join(", "),
        R::TABLE
    )
}

fn placeholders(start: usize, count: usize) -> String {
    (0..count)
        .map(|i| format!("?{}", start + i))
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl<R: SqlRecord> RecordStore<R> for SqliteStore<R> {
    async fn exists(&self, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.run(move |conn, owner| row_exists(conn, R::TABLE, &id, owner))
            .await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<R>> {
        let id = id.to_string();
        self.run(move |conn, owner| {
            let mut stmt = conn.prepare(&select_sql::<R>())?;
            let mut rows = stmt.query(params![id, owner])?;
            match rows.next()? {
                Some(row) => Ok(Some(R::from_row(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn get_all(&self) -> StoreResult<Vec<R>> {
        self.run(move |conn, owner| {
            let sql = format!(
                "SELECT record_id, version, {} FROM {} WHERE owner = ?1 ORDER BY record_id",
                R::FIELD_COLUMNS.join(", "),
                R::TABLE
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![owner])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(R::from_row(row)?);
            }
            Ok(records)
        })
        .await
    }

    async fn insert(&self, mut record: R) -> StoreResult<R> {
        record.set_version(0);
        let stored = record.clone();

        self.run(move |conn, owner| {
            let id = record.record_id().to_string();

            // Hybrid duplicate detection, step 1: cheap rejection for the
            // common case of obviously-duplicate input.
            if row_exists(conn, R::TABLE, &id, owner)? {
                return Err(SqliteError::Duplicate(id));
            }

            let sql = format!(
                "INSERT INTO {} (record_id, owner, version, {}) VALUES (?1, ?2, 0, {})",
                R::TABLE,
                R::FIELD_COLUMNS.join(", "),
                placeholders(3, R::FIELD_COLUMNS.len())
            );
            let mut values = vec![Value::Text(id.clone()), Value::Text(owner.to_string())];
            values.extend(record.field_values());

            match conn.execute(&sql, params_from_iter(values)) {
                Ok(_) => Ok(()),
                // Step 2 fallback: a concurrent writer won the race between
                // the pre-check and here; the constraint is authoritative
                // and the outcome must be indistinguishable from step 1.
                Err(e) if is_unique_violation(&e) => Err(SqliteError::Duplicate(id)),
                Err(e) => Err(e.into()),
            }
        })
        .await?;

        Ok(stored)
    }

    async fn replace(&self, record: R, expected_version: i64) -> StoreResult<R> {
        let mut stored = record.clone();
        stored.set_version(expected_version + 1);

        self.run(move |conn, owner| {
            let id = record.record_id().to_string();

            let sets = R::FIELD_COLUMNS
                .iter()
                .enumerate()
                .map(|(i, col)| format!("{col} = ?{}", i + 4))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE {} SET version = version + 1, {sets} \
                 WHERE record_id = ?1 AND owner = ?2 AND version = ?3",
                R::TABLE
            );
            let mut values = vec![
                Value::Text(id.clone()),
                Value::Text(owner.to_string()),
                Value::Integer(expected_version),
            ];
            values.extend(record.field_values());

            let rows = conn.execute(&sql, params_from_iter(values))?;
            if rows == 0 {
                // Absent record and stale version look identical here; the
                // caller disambiguates with a re-read.
                return Err(SqliteError::VersionConflict {
                    id,
                    expected: expected_version,
                });
            }
            Ok(())
        })
        .await?;

        Ok(stored)
    }

    async fn delete(&self, id: &str, expected_version: Option<i64>) -> StoreResult<bool> {
        let id = id.to_string();
        self.run(move |conn, owner| match expected_version {
            None => {
                let sql =
                    format!("DELETE FROM {} WHERE record_id = ?1 AND owner = ?2", R::TABLE);
                let rows = conn.execute(&sql, params![id, owner])?;
                Ok(rows > 0)
            }
            Some(expected) => {
                let sql = format!(
                    "DELETE FROM {} WHERE record_id = ?1 AND owner = ?2 AND version = ?3",
                    R::TABLE
                );
                let rows = conn.execute(&sql, params![id, owner, expected])?;
                if rows > 0 {
                    Ok(true)
                } else if row_exists(conn, R::TABLE, &id, owner)? {
                    Err(SqliteError::VersionConflict { id, expected })
                } else {
                    Ok(false)
                }
            }
        })
        .await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.run(move |conn, owner| {
            let sql = format!("DELETE FROM {} WHERE owner = ?1", R::TABLE);
            conn.execute(&sql, params![owner])?;
            Ok(())
        })
        .await
    }
}
