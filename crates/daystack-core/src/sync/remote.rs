//! Provider boundary for the sync engine.
//!
//! The client is stateless: every call takes the credential it should
//! act as, so nothing is shared or reconfigured between calls and no
//! cross-owner state can bleed through the client object.

use chrono::{DateTime, Utc};

use crate::error::SyncError;
use crate::storage::CredentialRecord;
use crate::sync::types::SyncWindow;

/// A single-occurrence event as reported by the provider. Recurring
/// events arrive pre-expanded; no recurrence handling happens locally.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvent {
    /// Provider-assigned identifier.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
}

/// Payload for creating an event at the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRemoteEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Outcome of a remote delete. A NotFound from the provider means the
/// deletion is already satisfied, which callers treat as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDelete {
    Deleted,
    NotFound,
}

/// Calendar provider operations used by the sync engine.
///
/// Every call requires a valid credential and is a suspension point on
/// network I/O.
#[allow(async_fn_in_trait)]
pub trait RemoteCalendar {
    /// List events in the window, in provider order.
    async fn list(
        &self,
        window: &SyncWindow,
        credential: &CredentialRecord,
    ) -> Result<Vec<RemoteEvent>, SyncError>;

    /// Insert an event, returning the created event with its provider id.
    async fn insert(
        &self,
        event: &NewRemoteEvent,
        credential: &CredentialRecord,
    ) -> Result<RemoteEvent, SyncError>;

    /// Delete an event by provider id.
    async fn delete(
        &self,
        provider_id: &str,
        credential: &CredentialRecord,
    ) -> Result<RemoteDelete, SyncError>;
}

impl<R: RemoteCalendar> RemoteCalendar for &R {
    async fn list(
        &self,
        window: &SyncWindow,
        credential: &CredentialRecord,
    ) -> Result<Vec<RemoteEvent>, SyncError> {
        (**self).list(window, credential).await
    }

    async fn insert(
        &self,
        event: &NewRemoteEvent,
        credential: &CredentialRecord,
    ) -> Result<RemoteEvent, SyncError> {
        (**self).insert(event, credential).await
    }

    async fn delete(
        &self,
        provider_id: &str,
        credential: &CredentialRecord,
    ) -> Result<RemoteDelete, SyncError> {
        (**self).delete(provider_id, credential).await
    }
}
