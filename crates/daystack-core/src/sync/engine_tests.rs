//! Sync engine facade tests: orchestrated passes, best-effort writes
//! and credential refresh ordering.

use chrono::{Duration, NaiveDate, Utc};

use crate::error::SyncError;
use crate::storage::{Config, CredentialRecord, Store};
use crate::sync::engine::{NewEventInput, SyncEngine};
use crate::sync::test_support::{fresh_credential, remote_event, FakeCalendar};
use crate::sync::types::SyncWindow;

fn connected_engine<'a>(fake: &'a FakeCalendar) -> SyncEngine<&'a FakeCalendar> {
    let store = Store::open_memory().unwrap();
    store.put_credential(&fresh_credential("local")).unwrap();
    SyncEngine::new(store, fake, Config::default())
}

#[tokio::test]
async fn sync_without_connection_short_circuits() {
    let fake = FakeCalendar::new();
    let store = Store::open_memory().unwrap();
    let engine = SyncEngine::new(store, &fake, Config::default());

    let err = engine.sync("local").await.unwrap_err();
    assert!(matches!(err, SyncError::NotConnected { .. }));
    assert!(fake.tokens_seen.lock().unwrap().is_empty(), "no remote calls attempted");
}

#[tokio::test]
async fn full_pass_reports_both_phase_counts() {
    let fake = FakeCalendar::with_events(vec![
        remote_event("g1", "Planning"),
        remote_event("g2", "Review"),
    ]);
    let engine = connected_engine(&fake);
    engine
        .store()
        .insert_task(
            &crate::task::Task::new("local", "Write report")
                .with_due(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), None),
        )
        .unwrap();

    let summary = engine.sync("local").await.unwrap();
    assert_eq!(summary.synced_events, 2);
    assert_eq!(summary.synced_tasks, 1);
    assert!(summary.pull_error.is_none());
    assert!(summary.push_error.is_none());

    let status = engine.status("local").unwrap();
    assert!(status.connected);
    assert!(status.last_synced_at.is_some());
    assert_eq!(status.pending_tasks, 0);
}

#[tokio::test]
async fn pull_failure_does_not_block_push() {
    let fake = FakeCalendar::new();
    *fake.fail_list.lock().unwrap() = true;
    let engine = connected_engine(&fake);
    engine
        .store()
        .insert_task(
            &crate::task::Task::new("local", "Write report")
                .with_due(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), None),
        )
        .unwrap();

    let summary = engine.sync("local").await.unwrap();
    assert!(summary.pull_error.is_some());
    assert_eq!(summary.synced_events, 0);
    assert_eq!(summary.synced_tasks, 1, "push phase ran despite pull failure");
}

#[tokio::test]
async fn expiring_credential_is_refreshed_before_remote_calls() {
    let mut server = mockito::Server::new_async().await;
    let token_mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token": "refreshed-token", "expires_in": 3600, "token_type": "Bearer"}"#)
        .create_async()
        .await;

    let store = Store::open_memory().unwrap();
    store
        .put_credential(&CredentialRecord {
            owner: "local".to_string(),
            access_token: "stale-token".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: Some(Utc::now() + Duration::minutes(1)),
        })
        .unwrap();

    let fake = FakeCalendar::with_events(vec![remote_event("g1", "Planning")]);
    let mut oauth = crate::sync::test_support::test_oauth();
    oauth.token_url = format!("{}/token", server.url());
    let engine = SyncEngine::with_oauth(store, &fake, Config::default(), oauth);

    engine.sync("local").await.unwrap();

    token_mock.assert_async().await;
    let tokens_seen = fake.tokens_seen.lock().unwrap();
    assert!(
        tokens_seen.iter().all(|t| t == "refreshed-token"),
        "every remote call used the refreshed token, got {tokens_seen:?}"
    );

    // response had no refresh token, so the stored one survives
    let stored = engine.store().credential("local").unwrap().unwrap();
    assert_eq!(stored.access_token, "refreshed-token");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn created_event_is_mirrored_and_linked() {
    let fake = FakeCalendar::new();
    let engine = connected_engine(&fake);
    let start = Utc::now();

    let event = engine
        .create_event(
            "local",
            NewEventInput {
                title: "Dentist".to_string(),
                description: None,
                location: None,
                start,
                end: start + Duration::minutes(45),
            },
        )
        .await
        .unwrap();

    assert!(event.is_linked());
    let stored = engine.store().event(&event.id).unwrap().unwrap();
    assert_eq!(stored.external_id, event.external_id);
    assert_eq!(fake.inserted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_mirror_keeps_event_local_only() {
    let fake = FakeCalendar::new();
    fake.fail_insert_titles.lock().unwrap().push("Dentist".to_string());
    let engine = connected_engine(&fake);
    let start = Utc::now();

    let event = engine
        .create_event(
            "local",
            NewEventInput {
                title: "Dentist".to_string(),
                description: None,
                location: None,
                start,
                end: start + Duration::minutes(45),
            },
        )
        .await
        .unwrap();

    assert!(!event.is_linked(), "creation succeeds, mirror is best-effort");
    assert!(engine.store().event(&event.id).unwrap().is_some());
}

#[tokio::test]
async fn task_creation_survives_failed_immediate_projection() {
    let fake = FakeCalendar::new();
    fake.fail_insert_titles.lock().unwrap().push("Write report".to_string());
    let engine = connected_engine(&fake);

    let task = engine
        .create_task(
            "local",
            "Write report",
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            None,
        )
        .await
        .unwrap();

    assert!(task.external_event_id.is_none());
    // still eligible for the next batch pass
    assert_eq!(engine.store().unsynced_tasks("local").unwrap().len(), 1);
}

#[tokio::test]
async fn task_creation_projects_immediately_when_connected() {
    let fake = FakeCalendar::new();
    let engine = connected_engine(&fake);

    let task = engine
        .create_task(
            "local",
            "Write report",
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(task.external_event_id.as_deref(), Some("r1"));
    assert_eq!(engine.store().unsynced_tasks("local").unwrap().len(), 0);
}

#[tokio::test]
async fn disconnect_returns_engine_to_not_connected() {
    let fake = FakeCalendar::new();
    let engine = connected_engine(&fake);
    assert!(engine.is_connected("local").unwrap());

    engine.disconnect("local").unwrap();
    assert!(!engine.is_connected("local").unwrap());
    let err = engine.sync("local").await.unwrap_err();
    assert!(matches!(err, SyncError::NotConnected { .. }));
}

#[tokio::test]
async fn list_events_is_owner_scoped() {
    let fake = FakeCalendar::with_events(vec![remote_event("g1", "Planning")]);
    let engine = connected_engine(&fake);
    engine.sync("local").await.unwrap();

    let window = SyncWindow::around_now(30, 60);
    assert_eq!(engine.list_events("local", &window).unwrap().len(), 1);
    assert!(engine.list_events("intruder", &window).unwrap().is_empty());
}
