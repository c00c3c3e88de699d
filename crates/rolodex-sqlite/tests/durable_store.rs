//! Behavior of the SQLite-backed store: hybrid duplicate detection,
//! optimistic locking, owner scoping.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rolodex_core::{
    Appointment, Contact, ContactPatch, DomainRecord, RecordService, RecordStore, StoreError, Task,
};
use rolodex_sqlite::{SqlitePool, SqliteStore};

fn contact(id: &str) -> Contact {
    Contact::new(id, "Ada", "Lovelace", "5551234567", "12 Analytical Way").unwrap()
}

fn task(id: &str) -> Task {
    Task::new(id, "write report", "quarterly numbers").unwrap()
}

fn contact_store(pool: &SqlitePool) -> SqliteStore<Contact> {
    SqliteStore::new(pool.clone(), "alice")
}

#[tokio::test]
async fn insert_then_get_round_trips() {
    let pool = SqlitePool::memory().unwrap();
    let store = contact_store(&pool);

    store.insert(contact("C1")).await.unwrap();

    let stored = store.get("C1").await.unwrap().unwrap();
    assert_eq!(stored.first_name(), "Ada");
    assert_eq!(stored.phone(), "5551234567");
    assert_eq!(stored.version(), 0);
}

#[tokio::test]
async fn duplicate_insert_is_rejected() {
    let pool = SqlitePool::memory().unwrap();
    let store = contact_store(&pool);

    store.insert(contact("C1")).await.unwrap();
    let err = store.insert(contact("C1")).await.unwrap_err();
    assert_eq!(err, StoreError::Duplicate { id: "C1".into() });
}

/// Concurrent adds of one id admit exactly one caller and leave exactly one
/// row in the backing table.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_adds_admit_exactly_one() {
    let pool = SqlitePool::memory().unwrap();
    let service = Arc::new(RecordService::new(
        Arc::new(SqliteStore::<Task>::new(pool.clone(), "alice")) as Arc<dyn RecordStore<Task>>,
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(
            async move { service.add(task("C2")).await.unwrap() },
        ));
    }
    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(service.get_all().await.unwrap().len(), 1);
}

/// The stored version increases by exactly 1 on every successful replace.
#[tokio::test]
async fn replace_increments_version_by_one_each_time() {
    let pool = SqlitePool::memory().unwrap();
    let store = contact_store(&pool);
    store.insert(contact("C1")).await.unwrap();

    for expected in 0..3 {
        let current = store.get("C1").await.unwrap().unwrap();
        assert_eq!(current.version(), expected);
        let stored = store.replace(current.clone(), expected).await.unwrap();
        assert_eq!(stored.version(), expected + 1);
    }
}

#[tokio::test]
async fn stale_replace_is_a_version_conflict() {
    let pool = SqlitePool::memory().unwrap();
    let store = contact_store(&pool);
    store.insert(contact("C1")).await.unwrap();

    let stale = store.get("C1").await.unwrap().unwrap();
    store.replace(stale.clone(), 0).await.unwrap();

    let err = store.replace(stale, 0).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { .. }));
}

/// An update racing a delete must conflict, never re-insert the record.
#[tokio::test]
async fn deleted_record_is_not_resurrected_by_a_stale_update() {
    let pool = SqlitePool::memory().unwrap();
    let store = contact_store(&pool);
    store.insert(contact("C3")).await.unwrap();

    // Snapshot taken before the delete.
    let stale = store.get("C3").await.unwrap().unwrap();

    assert!(store.delete("C3", None).await.unwrap());

    let err = store.replace(stale, 0).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { .. }));
    assert!(store.get("C3").await.unwrap().is_none());

    // The service path resolves the same race to "not found".
    let service = RecordService::new(
        Arc::new(contact_store(&pool)) as Arc<dyn RecordStore<Contact>>
    );
    let patch = ContactPatch {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        phone: "5559876543".to_string(),
        address: "17 Navy Yard".to_string(),
    };
    assert!(!service.update("C3", &patch).await.unwrap());
    assert!(store.get("C3").await.unwrap().is_none());
}

#[tokio::test]
async fn conditional_delete_checks_the_version() {
    let pool = SqlitePool::memory().unwrap();
    let store = contact_store(&pool);
    store.insert(contact("C1")).await.unwrap();

    let err = store.delete("C1", Some(7)).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { .. }));

    assert!(store.delete("C1", Some(0)).await.unwrap());
    assert!(!store.delete("C1", Some(0)).await.unwrap());
}

#[tokio::test]
async fn owners_are_isolated() {
    let pool = SqlitePool::memory().unwrap();
    let alice = SqliteStore::<Contact>::new(pool.clone(), "alice");
    let bob = SqliteStore::<Contact>::new(pool.clone(), "bob");

    // The same record id is allowed under different owners.
    alice.insert(contact("C1")).await.unwrap();
    bob.insert(contact("C1")).await.unwrap();

    assert_eq!(alice.get_all().await.unwrap().len(), 1);
    assert_eq!(bob.get_all().await.unwrap().len(), 1);

    alice.clear().await.unwrap();
    assert!(alice.get_all().await.unwrap().is_empty());
    assert!(bob.get("C1").await.unwrap().is_some());
}

#[tokio::test]
async fn appointment_dates_survive_storage() {
    let pool = SqlitePool::memory().unwrap();
    let store = SqliteStore::<Appointment>::new(pool.clone(), "alice");

    let date = Utc::now() + Duration::days(3);
    let appointment = Appointment::new("A1", date, "dentist").unwrap();
    store.insert(appointment).await.unwrap();

    let stored = store.get("A1").await.unwrap().unwrap();
    // RFC 3339 text storage keeps the instant exactly.
    assert_eq!(stored.date(), date);
}
