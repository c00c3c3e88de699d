//! The fallback-to-durable migration path: records inserted through the
//! legacy accessor before a durable backend exists must be observable
//! through it afterwards, exactly once.

use std::sync::Arc;

use rolodex_core::{
    project_service, register_project_service, AccessBridge, Contact, Project, ProjectStatus,
    RecordService, RecordStore,
};
use rolodex_sqlite::{SqlitePool, SqliteStore};
use serial_test::serial;

fn contact(id: &str, first_name: &str) -> Contact {
    Contact::new(id, first_name, "Lovelace", "5551234567", "12 Analytical Way").unwrap()
}

fn durable_contact_service(pool: &SqlitePool) -> Arc<RecordService<Contact>> {
    Arc::new(RecordService::new(Arc::new(SqliteStore::<Contact>::new(
        pool.clone(),
        "alice",
    )) as Arc<dyn RecordStore<Contact>>))
}

/// Insert via the fallback, register a durable-backed service, and the same
/// record is served from the durable store afterwards.
#[tokio::test]
async fn fallback_records_are_visible_through_the_durable_store() {
    let bridge = AccessBridge::<Contact>::new();

    let legacy = bridge.service().await;
    assert!(legacy.add(contact("C1", "Ada")).await.unwrap());
    let before: Vec<String> = legacy
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|c| c.contact_id().to_string())
        .collect();
    assert_eq!(before, vec!["C1"]);

    let pool = SqlitePool::memory().unwrap();
    let durable = durable_contact_service(&pool);
    bridge.register(Arc::clone(&durable)).await.unwrap();

    // The durable table now holds the fallback record.
    let probe = SqliteStore::<Contact>::new(pool.clone(), "alice");
    assert!(probe.get("C1").await.unwrap().is_some());

    // A second legacy access still sees C1, now served by the registered
    // service.
    let after = bridge.service().await;
    assert!(Arc::ptr_eq(&after, &durable));
    let ids: Vec<String> = after
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|c| c.contact_id().to_string())
        .collect();
    assert_eq!(ids, vec!["C1"]);
}

/// Concurrent registrations after fallback inserts migrate exactly once,
/// with no duplicate-key error escaping to any caller.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_registrations_migrate_exactly_once() {
    let bridge = Arc::new(AccessBridge::<Contact>::new());

    let legacy = bridge.service().await;
    for id in ["C1", "C2", "C3"] {
        assert!(legacy.add(contact(id, "Ada")).await.unwrap());
    }

    let pool = SqlitePool::memory().unwrap();
    let mut handles = Vec::new();
    for _ in 0..4 {
        let bridge = Arc::clone(&bridge);
        let service = durable_contact_service(&pool);
        handles.push(tokio::spawn(async move { bridge.register(service).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let probe = SqliteStore::<Contact>::new(pool.clone(), "alice");
    assert_eq!(probe.get_all().await.unwrap().len(), 3);
}

/// Migration is best-effort reconciliation: a record the durable side
/// already holds is skipped, and the durable copy wins.
#[tokio::test]
async fn migration_keeps_the_durable_copy_on_collision() {
    let bridge = AccessBridge::<Contact>::new();

    let legacy = bridge.service().await;
    legacy.add(contact("C1", "Fallback")).await.unwrap();
    legacy.add(contact("C2", "Ada")).await.unwrap();

    let pool = SqlitePool::memory().unwrap();
    let durable = durable_contact_service(&pool);
    durable.add(contact("C1", "Durable")).await.unwrap();

    bridge.register(Arc::clone(&durable)).await.unwrap();

    let all = durable.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
    let c1 = durable.get_by_id("C1").await.unwrap().unwrap();
    assert_eq!(c1.first_name(), "Durable");
}

/// Registering before any legacy access goes straight to the durable store.
#[tokio::test]
async fn di_first_startup_has_nothing_to_migrate() {
    let bridge = AccessBridge::<Contact>::new();

    let pool = SqlitePool::memory().unwrap();
    let durable = durable_contact_service(&pool);
    bridge.register(Arc::clone(&durable)).await.unwrap();

    assert!(bridge.migrated().await);
    assert!(Arc::ptr_eq(&bridge.service().await, &durable));
    assert!(durable.get_all().await.unwrap().is_empty());
}

/// End-to-end through the process-wide accessor: the same flow the
/// composition root runs at startup.
#[tokio::test]
#[serial]
async fn global_accessor_survives_registration() {
    let legacy = project_service().await;
    let seeded = legacy
        .add(Project::new("P1", "migration", "", ProjectStatus::Active).unwrap())
        .await
        .unwrap();

    let pool = SqlitePool::memory().unwrap();
    let durable = Arc::new(RecordService::new(Arc::new(SqliteStore::<Project>::new(
        pool.clone(),
        "alice",
    )) as Arc<dyn RecordStore<Project>>));
    register_project_service(Arc::clone(&durable)).await.unwrap();

    let service = project_service().await;
    assert!(Arc::ptr_eq(&service, &durable));
    if seeded {
        // P1 went in through the fallback and must still be readable.
        assert!(service.get_by_id("P1").await.unwrap().is_some());
    }
}
