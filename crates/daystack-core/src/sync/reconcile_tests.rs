//! Reconciliation engine tests.

use crate::error::SyncError;
use crate::event::EventSource;
use crate::storage::Store;
use crate::sync::reconcile::ReconciliationEngine;
use crate::sync::test_support::{fresh_credential, remote_event, wide_window, FakeCalendar};

#[tokio::test]
async fn first_pass_creates_one_row_per_remote_event() {
    let store = Store::open_memory().unwrap();
    let fake = FakeCalendar::with_events(vec![
        remote_event("g1", "Planning"),
        remote_event("g2", "Review"),
    ]);
    let engine = ReconciliationEngine::new(&store, &fake);

    let synced = engine
        .reconcile("ada", &wide_window(), &fresh_credential("ada"))
        .await
        .unwrap();
    assert_eq!(synced, 2);

    let events = store.events_in_window("ada", &wide_window()).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.source == EventSource::External));
}

#[tokio::test]
async fn second_pass_updates_changed_title_in_place() {
    let store = Store::open_memory().unwrap();
    let fake = FakeCalendar::with_events(vec![
        remote_event("g1", "Planning"),
        remote_event("g2", "Review"),
    ]);
    let engine = ReconciliationEngine::new(&store, &fake);
    let credential = fresh_credential("ada");

    engine.reconcile("ada", &wide_window(), &credential).await.unwrap();

    fake.set_event_title("g1", "Planning (moved)");
    let synced = engine.reconcile("ada", &wide_window(), &credential).await.unwrap();
    assert_eq!(synced, 2);

    let events = store.events_in_window("ada", &wide_window()).unwrap();
    assert_eq!(events.len(), 2, "no duplicates after re-reconciling");

    let g1 = events.iter().find(|e| e.external_id.as_deref() == Some("g1")).unwrap();
    let g2 = events.iter().find(|e| e.external_id.as_deref() == Some("g2")).unwrap();
    assert_eq!(g1.title, "Planning (moved)");
    assert_eq!(g2.title, "Review");
}

#[tokio::test]
async fn reconciling_unchanged_window_is_idempotent() {
    let store = Store::open_memory().unwrap();
    let fake = FakeCalendar::with_events(vec![remote_event("g1", "Planning")]);
    let engine = ReconciliationEngine::new(&store, &fake);
    let credential = fresh_credential("ada");

    for _ in 0..3 {
        engine.reconcile("ada", &wide_window(), &credential).await.unwrap();
    }
    assert_eq!(store.events_in_window("ada", &wide_window()).unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_listing_is_whole_phase_failure() {
    let store = Store::open_memory().unwrap();
    let fake = FakeCalendar::with_events(vec![remote_event("g1", "Planning")]);
    *fake.fail_list.lock().unwrap() = true;
    let engine = ReconciliationEngine::new(&store, &fake);

    let err = engine
        .reconcile("ada", &wide_window(), &fresh_credential("ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Remote(_)));
    assert!(store.events_in_window("ada", &wide_window()).unwrap().is_empty());
}
