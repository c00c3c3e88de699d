//! Core of the rolodex record-keeping service.
//!
//! This crate owns everything except the durable backend:
//!
//! - **domain**: the four record kinds (contact, task, appointment,
//!   project), self-validating with atomic whole-object updates and an
//!   optimistic-lock version counter
//! - **store**: the [`RecordStore`] abstraction plus the in-memory
//!   [`MemoryStore`] fallback
//! - **service**: [`RecordService`], the business surface with boolean
//!   duplicate/not-found results and bounded conflict retries
//! - **bridge**: [`AccessBridge`] and the process-wide legacy accessors,
//!   including the one-time migration from the fallback store to a
//!   registered durable-backed service
//!
//! The durable SQLite implementation of [`RecordStore`] lives in
//! `rolodex-sqlite`, which depends on this crate and never the reverse.

pub mod bridge;
pub mod domain;
pub mod service;
pub mod store;

// Re-exports
pub use bridge::{
    appointment_service, contact_service, project_service, register_appointment_service,
    register_contact_service, register_project_service, register_task_service, task_service,
    AccessBridge,
};
pub use domain::{
    Appointment, AppointmentPatch, Contact, ContactPatch, DomainRecord, Project, ProjectPatch,
    ProjectStatus, Task, TaskPatch, ValidationError,
};
pub use service::{RecordService, ServiceError, MAX_UPDATE_ATTEMPTS};
pub use store::{MemoryStore, RecordStore, StoreError, StoreResult};
