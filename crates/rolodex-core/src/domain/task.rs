//! Task record.

use serde::Serialize;

use super::validation::{
    self, ValidationError, MAX_DESCRIPTION_LENGTH, MAX_ID_LENGTH, MAX_TASK_NAME_LENGTH,
};
use super::DomainRecord;

/// A task entry: id (1-10 chars, immutable), name (1-20), description (1-50).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    task_id: String,
    name: String,
    description: String,
    version: i64,
}

/// New values for every mutable `Task` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: String,
    pub description: String,
}

impl Task {
    pub fn new(task_id: &str, name: &str, description: &str) -> Result<Self, ValidationError> {
        Self::hydrate(task_id, name, description, 0)
    }

    /// Reconstructs a task from stored fields, keeping its stored version.
    pub fn hydrate(
        task_id: &str,
        name: &str,
        description: &str,
        version: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            task_id: validation::validate_trimmed_length(task_id, "taskId", 1, MAX_ID_LENGTH)?,
            name: validation::validate_trimmed_length(name, "name", 1, MAX_TASK_NAME_LENGTH)?,
            description: validation::validate_trimmed_length(
                description,
                "description",
                1,
                MAX_DESCRIPTION_LENGTH,
            )?,
            version,
        })
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl DomainRecord for Task {
    type Patch = TaskPatch;

    const KIND: &'static str = "task";
    const ID_FIELD: &'static str = "taskId";

    fn record_id(&self) -> &str {
        &self.task_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn apply(&mut self, patch: &TaskPatch) -> Result<(), ValidationError> {
        let name = validation::validate_trimmed_length(&patch.name, "name", 1, MAX_TASK_NAME_LENGTH)?;
        let description = validation::validate_trimmed_length(
            &patch.description,
            "description",
            1,
            MAX_DESCRIPTION_LENGTH,
        )?;

        self.name = name;
        self.description = description;
        Ok(())
    }
}
