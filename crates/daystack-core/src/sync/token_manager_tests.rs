//! Token lifecycle tests.

use chrono::{Duration, Utc};

use crate::storage::{CredentialRecord, Store};
use crate::sync::test_support::test_oauth;
use crate::sync::token_manager::TokenLifecycleManager;

fn record(owner: &str, expires_in_minutes: i64) -> CredentialRecord {
    CredentialRecord {
        owner: owner.to_string(),
        access_token: "stale-token".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: Some(Utc::now() + Duration::minutes(expires_in_minutes)),
    }
}

#[tokio::test]
async fn never_connected_owner_yields_none() {
    let store = Store::open_memory().unwrap();
    let manager = TokenLifecycleManager::new(&store, test_oauth());
    assert!(manager.ensure_credential("ada").await.unwrap().is_none());
}

#[tokio::test]
async fn fresh_credential_is_returned_without_refresh() {
    let mut server = mockito::Server::new_async().await;
    let token_mock = server
        .mock("POST", "/token")
        .expect(0)
        .create_async()
        .await;

    let store = Store::open_memory().unwrap();
    store.put_credential(&record("ada", 60)).unwrap();

    let mut oauth = test_oauth();
    oauth.token_url = format!("{}/token", server.url());
    let manager = TokenLifecycleManager::new(&store, oauth);

    let credential = manager.ensure_credential("ada").await.unwrap().unwrap();
    assert_eq!(credential.access_token, "stale-token");
    token_mock.assert_async().await;
}

#[tokio::test]
async fn expiring_credential_is_refreshed_and_persisted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token": "new-token", "expires_in": 3600, "token_type": "Bearer"}"#)
        .create_async()
        .await;

    let store = Store::open_memory().unwrap();
    store.put_credential(&record("ada", 2)).unwrap();

    let mut oauth = test_oauth();
    oauth.token_url = format!("{}/token", server.url());
    let manager = TokenLifecycleManager::new(&store, oauth);

    let credential = manager.ensure_credential("ada").await.unwrap().unwrap();
    assert_eq!(credential.access_token, "new-token");
    assert_eq!(credential.refresh_token.as_deref(), Some("refresh-1"));

    let stored = store.credential("ada").unwrap().unwrap();
    assert_eq!(stored.access_token, "new-token");
}

#[tokio::test]
async fn refresh_failure_returns_stale_credential() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create_async()
        .await;

    let store = Store::open_memory().unwrap();
    store.put_credential(&record("ada", 2)).unwrap();

    let mut oauth = test_oauth();
    oauth.token_url = format!("{}/token", server.url());
    let manager = TokenLifecycleManager::new(&store, oauth);

    // non-fatal: the stale credential comes back and the dependent
    // remote call is the one that reports failure
    let credential = manager.ensure_credential("ada").await.unwrap().unwrap();
    assert_eq!(credential.access_token, "stale-token");
}

#[tokio::test]
async fn missing_refresh_token_skips_refresh() {
    let store = Store::open_memory().unwrap();
    let mut rec = record("ada", 2);
    rec.refresh_token = None;
    store.put_credential(&rec).unwrap();

    let manager = TokenLifecycleManager::new(&store, test_oauth());
    let credential = manager.ensure_credential("ada").await.unwrap().unwrap();
    assert_eq!(credential.access_token, "stale-token");
}
