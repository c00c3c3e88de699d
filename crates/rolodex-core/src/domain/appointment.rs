//! Appointment record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validation::{self, ValidationError, MAX_DESCRIPTION_LENGTH, MAX_ID_LENGTH};
use super::DomainRecord;

/// An appointment entry: id (1-10 chars, immutable), a date that must not be
/// in the past at validation time, and a description (1-50 chars).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    appointment_id: String,
    date: DateTime<Utc>,
    description: String,
    version: i64,
}

/// New values for every mutable `Appointment` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub date: DateTime<Utc>,
    pub description: String,
}

impl Appointment {
    pub fn new(
        appointment_id: &str,
        date: DateTime<Utc>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let date = validation::validate_not_past(date, "appointmentDate")?;
        Self::hydrate(appointment_id, date, description, 0)
    }

    /// Reconstructs an appointment from stored fields, keeping its stored
    /// version.
    ///
    /// Skips the not-in-past check: a stored appointment whose date has
    /// since passed must still load.
    pub fn hydrate(
        appointment_id: &str,
        date: DateTime<Utc>,
        description: &str,
        version: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            appointment_id: validation::validate_trimmed_length(
                appointment_id,
                "appointmentId",
                1,
                MAX_ID_LENGTH,
            )?,
            date,
            description: validation::validate_trimmed_length(
                description,
                "description",
                1,
                MAX_DESCRIPTION_LENGTH,
            )?,
            version,
        })
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl DomainRecord for Appointment {
    type Patch = AppointmentPatch;

    const KIND: &'static str = "appointment";
    const ID_FIELD: &'static str = "appointmentId";

    fn record_id(&self) -> &str {
        &self.appointment_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn apply(&mut self, patch: &AppointmentPatch) -> Result<(), ValidationError> {
        let date = validation::validate_not_past(patch.date, "appointmentDate")?;
        let description = validation::validate_trimmed_length(
            &patch.description,
            "description",
            1,
            MAX_DESCRIPTION_LENGTH,
        )?;

        self.date = date;
        self.description = description;
        Ok(())
    }
}
