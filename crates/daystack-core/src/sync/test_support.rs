//! Shared fixtures for sync tests: an in-memory scripted provider and
//! credential/window helpers.

use std::sync::Mutex;

use chrono::{Duration, Utc};

use crate::error::SyncError;
use crate::integrations::oauth::OAuthConfig;
use crate::storage::CredentialRecord;
use crate::sync::remote::{NewRemoteEvent, RemoteCalendar, RemoteDelete, RemoteEvent};
use crate::sync::types::SyncWindow;

/// How the fake responds to delete calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehavior {
    Deleted,
    NotFound,
    Fail,
}

/// Scripted in-memory calendar provider.
#[derive(Default)]
pub struct FakeCalendar {
    pub remote_events: Mutex<Vec<RemoteEvent>>,
    pub fail_list: Mutex<bool>,
    /// Titles whose insert should be rejected.
    pub fail_insert_titles: Mutex<Vec<String>>,
    pub delete_behavior: Mutex<Option<DeleteBehavior>>,
    /// Every successfully inserted payload, in order.
    pub inserted: Mutex<Vec<NewRemoteEvent>>,
    /// Provider ids delete was called with.
    pub deleted: Mutex<Vec<String>>,
    /// Access tokens observed across all calls.
    pub tokens_seen: Mutex<Vec<String>>,
    next_id: Mutex<u32>,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<RemoteEvent>) -> Self {
        let fake = Self::new();
        *fake.remote_events.lock().unwrap() = events;
        fake
    }

    pub fn set_event_title(&self, id: &str, title: &str) {
        let mut events = self.remote_events.lock().unwrap();
        if let Some(event) = events.iter_mut().find(|e| e.id == id) {
            event.title = title.to_string();
        }
    }
}

impl RemoteCalendar for FakeCalendar {
    async fn list(
        &self,
        _window: &SyncWindow,
        credential: &CredentialRecord,
    ) -> Result<Vec<RemoteEvent>, SyncError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(credential.access_token.clone());
        if *self.fail_list.lock().unwrap() {
            return Err(SyncError::Remote("listing rejected".to_string()));
        }
        Ok(self.remote_events.lock().unwrap().clone())
    }

    async fn insert(
        &self,
        event: &NewRemoteEvent,
        credential: &CredentialRecord,
    ) -> Result<RemoteEvent, SyncError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(credential.access_token.clone());
        if self.fail_insert_titles.lock().unwrap().contains(&event.title) {
            return Err(SyncError::Remote(format!("insert of '{}' rejected", event.title)));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = RemoteEvent {
            id: format!("r{}", *next_id),
            title: event.title.clone(),
            description: event.description.clone(),
            location: None,
            start: event.start,
            end: event.end,
            all_day: false,
        };
        self.inserted.lock().unwrap().push(event.clone());
        Ok(created)
    }

    async fn delete(
        &self,
        provider_id: &str,
        credential: &CredentialRecord,
    ) -> Result<RemoteDelete, SyncError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(credential.access_token.clone());
        self.deleted.lock().unwrap().push(provider_id.to_string());
        match self.delete_behavior.lock().unwrap().unwrap_or(DeleteBehavior::Deleted) {
            DeleteBehavior::Deleted => Ok(RemoteDelete::Deleted),
            DeleteBehavior::NotFound => Ok(RemoteDelete::NotFound),
            DeleteBehavior::Fail => Err(SyncError::Remote("delete rejected".to_string())),
        }
    }
}

/// A credential far from expiry, so no refresh is attempted.
pub fn fresh_credential(owner: &str) -> CredentialRecord {
    CredentialRecord {
        owner: owner.to_string(),
        access_token: "fresh-token".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: Some(Utc::now() + Duration::hours(1)),
    }
}

/// A window comfortably containing "now".
pub fn wide_window() -> SyncWindow {
    SyncWindow::around_now(30, 60)
}

/// OAuth config with unreachable endpoints; tests that need the token
/// endpoint point it at a mock server instead.
pub fn test_oauth() -> OAuthConfig {
    OAuthConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        auth_url: "http://localhost:1/auth".to_string(),
        token_url: "http://localhost:1/token".to_string(),
        scopes: vec![],
        redirect_port: 0,
        timeout: std::time::Duration::from_secs(5),
    }
}

/// Remote event fixture with a 30-minute span starting now.
pub fn remote_event(id: &str, title: &str) -> RemoteEvent {
    let start = Utc::now();
    RemoteEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        location: None,
        start,
        end: start + Duration::minutes(30),
        all_day: false,
    }
}
