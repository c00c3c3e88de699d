//! Row mapping between the domain record kinds and their tables.
//!
//! Every table shares the `record_id`/`owner`/`version` spine; this trait
//! supplies what differs per kind so `SqliteStore` stays generic.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

use rolodex_core::{Appointment, Contact, DomainRecord, Project, ProjectStatus, Task};

use crate::error::{SqliteError, SqliteResult};

/// A record kind with a SQLite table behind it.
pub trait SqlRecord: DomainRecord {
    /// Table name.
    const TABLE: &'static str;

    /// Domain field columns, excluding the `record_id`/`owner`/`version`
    /// spine.
    const FIELD_COLUMNS: &'static [&'static str];

    /// Owned parameter values for [`Self::FIELD_COLUMNS`], same order.
    fn field_values(&self) -> Vec<Value>;

    /// Rebuilds the record from a row that selected `record_id`, `version`,
    /// and [`Self::FIELD_COLUMNS`].
    fn from_row(row: &Row<'_>) -> SqliteResult<Self>;
}

fn corrupt(id: &str, message: impl ToString) -> SqliteError {
    SqliteError::CorruptRow {
        id: id.to_string(),
        message: message.to_string(),
    }
}

impl SqlRecord for Contact {
    const TABLE: &'static str = "contacts";
    const FIELD_COLUMNS: &'static [&'static str] =
        &["first_name", "last_name", "phone", "address"];

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.first_name().to_string()),
            Value::Text(self.last_name().to_string()),
            Value::Text(self.phone().to_string()),
            Value::Text(self.address().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        let id: String = row.get("record_id")?;
        let version: i64 = row.get("version")?;
        let first_name: String = row.get("first_name")?;
        let last_name: String = row.get("last_name")?;
        let phone: String = row.get("phone")?;
        let address: String = row.get("address")?;

        Self::hydrate(&id, &first_name, &last_name, &phone, &address, version)
            .map_err(|e| corrupt(&id, e))
    }
}

impl SqlRecord for Task {
    const TABLE: &'static str = "tasks";
    const FIELD_COLUMNS: &'static [&'static str] = &["name", "description"];

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name().to_string()),
            Value::Text(self.description().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        let id: String = row.get("record_id")?;
        let version: i64 = row.get("version")?;
        let name: String = row.get("name")?;
        let description: String = row.get("description")?;

        Self::hydrate(&id, &name, &description, version).map_err(|e| corrupt(&id, e))
    }
}

impl SqlRecord for Appointment {
    const TABLE: &'static str = "appointments";
    const FIELD_COLUMNS: &'static [&'static str] = &["date", "description"];

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.date().to_rfc3339()),
            Value::Text(self.description().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        let id: String = row.get("record_id")?;
        let version: i64 = row.get("version")?;
        let date: String = row.get("date")?;
        let description: String = row.get("description")?;

        let date: DateTime<Utc> = DateTime::parse_from_rfc3339(&date)
            .map_err(|e| corrupt(&id, e))?
            .with_timezone(&Utc);

        // hydrate, not new: a stored appointment whose date has passed must
        // still load.
        Self::hydrate(&id, date, &description, version).map_err(|e| corrupt(&id, e))
    }
}

impl SqlRecord for Project {
    const TABLE: &'static str = "projects";
    const FIELD_COLUMNS: &'static [&'static str] = &["name", "description", "status"];

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name().to_string()),
            Value::Text(self.description().to_string()),
            Value::Text(self.status().as_str().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        let id: String = row.get("record_id")?;
        let version: i64 = row.get("version")?;
        let name: String = row.get("name")?;
        let description: String = row.get("description")?;
        let status: String = row.get("status")?;

        let status = ProjectStatus::parse(&status)
            .ok_or_else(|| corrupt(&id, format!("unknown project status '{status}'")))?;

        Self::hydrate(&id, &name, &description, status, version).map_err(|e| corrupt(&id, e))
    }
}
