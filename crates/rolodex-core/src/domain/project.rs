//! Project record.

use serde::Serialize;

use super::validation::{
    self, ValidationError, MAX_ID_LENGTH, MAX_PROJECT_DESCRIPTION_LENGTH, MAX_PROJECT_NAME_LENGTH,
};
use super::DomainRecord;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// Storage representation, also used by the durable schema's CHECK
    /// constraint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::OnHold => "ON_HOLD",
            Self::Completed => "COMPLETED",
            Self::Archived => "ARCHIVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "ON_HOLD" => Some(Self::OnHold),
            "COMPLETED" => Some(Self::Completed),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A project entry: id (1-10 chars, immutable), name (1-50), description
/// (0-100, may be empty), and a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    project_id: String,
    name: String,
    description: String,
    status: ProjectStatus,
    version: i64,
}

/// New values for every mutable `Project` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(
        project_id: &str,
        name: &str,
        description: &str,
        status: ProjectStatus,
    ) -> Result<Self, ValidationError> {
        Self::hydrate(project_id, name, description, status, 0)
    }

    /// Reconstructs a project from stored fields, keeping its stored version.
    pub fn hydrate(
        project_id: &str,
        name: &str,
        description: &str,
        status: ProjectStatus,
        version: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            project_id: validation::validate_trimmed_length(
                project_id,
                "projectId",
                1,
                MAX_ID_LENGTH,
            )?,
            name: validation::validate_trimmed_length(name, "name", 1, MAX_PROJECT_NAME_LENGTH)?,
            description: validation::validate_trimmed_length(
                description,
                "description",
                0,
                MAX_PROJECT_DESCRIPTION_LENGTH,
            )?,
            status,
            version,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }
}

impl DomainRecord for Project {
    type Patch = ProjectPatch;

    const KIND: &'static str = "project";
    const ID_FIELD: &'static str = "projectId";

    fn record_id(&self) -> &str {
        &self.project_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn apply(&mut self, patch: &ProjectPatch) -> Result<(), ValidationError> {
        let name =
            validation::validate_trimmed_length(&patch.name, "name", 1, MAX_PROJECT_NAME_LENGTH)?;
        let description = validation::validate_trimmed_length(
            &patch.description,
            "description",
            0,
            MAX_PROJECT_DESCRIPTION_LENGTH,
        )?;

        self.name = name;
        self.description = description;
        self.status = patch.status;
        Ok(())
    }
}
