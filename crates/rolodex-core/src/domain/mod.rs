//! Domain model: the four record kinds and the trait unifying them.
//!
//! Each record is a self-validating value type. Construction goes through a
//! fallible constructor, identifiers are immutable afterwards, and updates
//! are applied as whole-object patches that validate every field before
//! mutating any, so a record can never be observed half-updated.

pub mod appointment;
pub mod contact;
pub mod project;
pub mod task;
pub mod validation;

pub use appointment::{Appointment, AppointmentPatch};
pub use contact::{Contact, ContactPatch};
pub use project::{Project, ProjectPatch, ProjectStatus};
pub use task::{Task, TaskPatch};
pub use validation::ValidationError;

/// Common surface of the record kinds, used by the generic store, service,
/// and bridge machinery.
///
/// `Clone` doubles as the defensive-copy mechanism: stores only ever hand
/// out owned clones, never references into their internal state.
pub trait DomainRecord: Clone + Send + Sync + 'static {
    /// Patch carrying new values for every mutable field.
    type Patch: Clone + Send + Sync + 'static;

    /// Kind label used in log output, e.g. `"contact"`.
    const KIND: &'static str;

    /// Field label used in validation errors for id arguments,
    /// e.g. `"contactId"`.
    const ID_FIELD: &'static str;

    /// Application-assigned identifier, unique per store and owner.
    fn record_id(&self) -> &str;

    /// Optimistic-lock counter; starts at 0 and increases by exactly 1 on
    /// every successful replace.
    fn version(&self) -> i64;

    fn set_version(&mut self, version: i64);

    /// Applies `patch` to the mutable fields, all-or-nothing: if any value
    /// fails validation, the record is left untouched.
    fn apply(&mut self, patch: &Self::Patch) -> Result<(), ValidationError>;
}
