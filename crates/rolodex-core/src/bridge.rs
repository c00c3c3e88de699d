//! The singleton/DI unification layer.
//!
//! Legacy callers reach a service through a process-wide accessor that must
//! work before any composition root has run; dependency-injected callers
//! construct their own [`RecordService`] over the durable store and register
//! it here. The bridge guarantees both paths observe the same logical
//! dataset:
//!
//! - **Uninitialized → FallbackActive**: the first legacy access lazily
//!   creates one service over a [`MemoryStore`]; exactly one, even under a
//!   thundering herd.
//! - **FallbackActive → Migrated**: on registration, every fallback record
//!   is copied into the registered service through its normal `add` (so the
//!   same duplicate rules apply; duplicates are swallowed), then the
//!   authoritative pointer is repointed. Runs exactly once.
//! - **Uninitialized → Migrated**: registration before any legacy access
//!   migrates nothing.
//!
//! Once migrated, the pointer never goes back to a fallback-backed service.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::{Appointment, Contact, DomainRecord, Project, Task};
use crate::service::{RecordService, ServiceError};
use crate::store::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeState {
    Uninitialized,
    FallbackActive,
    Migrated,
}

/// Unifies legacy global access with dependency-injected access for one
/// record kind.
///
/// The authoritative-service pointer is read by any caller without exclusive
/// locking; it is only written inside the state-transition critical section.
pub struct AccessBridge<R: DomainRecord> {
    state: Mutex<BridgeState>,
    current: RwLock<Option<Arc<RecordService<R>>>>,
}

impl<R: DomainRecord> AccessBridge<R> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BridgeState::Uninitialized),
            current: RwLock::new(None),
        }
    }

    /// Legacy accessor: returns the currently authoritative service, lazily
    /// creating the fallback-backed one on first use.
    ///
    /// Safe to call from any thread at any time during process lifetime.
    pub async fn service(&self) -> Arc<RecordService<R>> {
        if let Some(service) = self.current.read().await.as_ref() {
            return Arc::clone(service);
        }

        let mut state = self.state.lock().await;
        // Another caller may have completed the transition while we waited.
        if let Some(service) = self.current.read().await.as_ref() {
            return Arc::clone(service);
        }

        let service = Arc::new(RecordService::new(Arc::new(MemoryStore::<R>::new())));
        *self.current.write().await = Some(Arc::clone(&service));
        *state = BridgeState::FallbackActive;
        info!(
            kind = R::KIND,
            "legacy access before registration, serving from in-memory fallback store"
        );
        service
    }

    /// Registers a dependency-injected service as authoritative.
    ///
    /// If the fallback store is live, its records are migrated first; a
    /// failure mid-migration leaves the bridge on the fallback so no records
    /// are stranded. Records the durable side already holds are skipped.
    pub async fn register(&self, service: Arc<RecordService<R>>) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;

        if *state == BridgeState::FallbackActive {
            let fallback = self.current.read().await.clone();
            if let Some(fallback) = fallback {
                let records = fallback.get_all().await?;
                let total = records.len();
                let mut migrated = 0usize;
                for record in records {
                    let id = record.record_id().to_string();
                    if service.add(record).await? {
                        migrated += 1;
                    } else {
                        debug!(
                            kind = R::KIND,
                            id = %id,
                            "registered store already holds record, keeping its copy"
                        );
                    }
                }
                info!(
                    kind = R::KIND,
                    migrated, total, "fallback records migrated to registered service"
                );
            }
        }

        *self.current.write().await = Some(service);
        *state = BridgeState::Migrated;
        Ok(())
    }

    /// Whether a dependency-injected service has become authoritative.
    pub async fn migrated(&self) -> bool {
        *self.state.lock().await == BridgeState::Migrated
    }
}

impl<R: DomainRecord> Default for AccessBridge<R> {
    fn default() -> Self {
        Self::new()
    }
}

static CONTACTS: Lazy<AccessBridge<Contact>> = Lazy::new(AccessBridge::new);
static TASKS: Lazy<AccessBridge<Task>> = Lazy::new(AccessBridge::new);
static APPOINTMENTS: Lazy<AccessBridge<Appointment>> = Lazy::new(AccessBridge::new);
static PROJECTS: Lazy<AccessBridge<Project>> = Lazy::new(AccessBridge::new);

/// Process-wide legacy accessor for the contact service.
pub async fn contact_service() -> Arc<RecordService<Contact>> {
    CONTACTS.service().await
}

/// Registers the dependency-injected contact service; called by the
/// composition root once the durable backend is wired.
pub async fn register_contact_service(
    service: Arc<RecordService<Contact>>,
) -> Result<(), ServiceError> {
    CONTACTS.register(service).await
}

/// Process-wide legacy accessor for the task service.
pub async fn task_service() -> Arc<RecordService<Task>> {
    TASKS.service().await
}

/// Registers the dependency-injected task service.
pub async fn register_task_service(service: Arc<RecordService<Task>>) -> Result<(), ServiceError> {
    TASKS.register(service).await
}

/// Process-wide legacy accessor for the appointment service.
pub async fn appointment_service() -> Arc<RecordService<Appointment>> {
    APPOINTMENTS.service().await
}

/// Registers the dependency-injected appointment service.
pub async fn register_appointment_service(
    service: Arc<RecordService<Appointment>>,
) -> Result<(), ServiceError> {
    APPOINTMENTS.register(service).await
}

/// Process-wide legacy accessor for the project service.
pub async fn project_service() -> Arc<RecordService<Project>> {
    PROJECTS.service().await
}

/// Registers the dependency-injected project service.
pub async fn register_project_service(
    service: Arc<RecordService<Project>>,
) -> Result<(), ServiceError> {
    PROJECTS.register(service).await
}
