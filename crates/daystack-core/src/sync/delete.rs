//! Coordinated event deletion with best-effort remote mirroring.

use crate::error::SyncError;
use crate::event::EventSource;
use crate::storage::Store;
use crate::sync::remote::{RemoteCalendar, RemoteDelete};
use crate::sync::token_manager::TokenLifecycleManager;
use crate::sync::types::DeleteReport;

/// Removes a local event and mirrors the deletion remotely when the
/// event came from the provider.
///
/// The local store is authoritative for what the user sees: the local
/// row is always removed, whatever the remote attempt's outcome. A
/// remote delete that fails for any reason other than NotFound leaves
/// an orphaned event at the provider; that drift is accepted and only
/// surfaced as a warning (no compensating retry queue).
pub struct DeletionCoordinator<'a, R: RemoteCalendar> {
    store: &'a Store,
    remote: &'a R,
    tokens: &'a TokenLifecycleManager<'a>,
}

impl<'a, R: RemoteCalendar> DeletionCoordinator<'a, R> {
    pub fn new(store: &'a Store, remote: &'a R, tokens: &'a TokenLifecycleManager<'a>) -> Self {
        Self {
            store,
            remote,
            tokens,
        }
    }

    /// Delete `event_id` on behalf of `requester`.
    ///
    /// Fails with `EventNotFound` if no such local event exists and
    /// `Forbidden` if the requester is not the owner. Otherwise the
    /// local row is removed and the report carries any remote warning.
    pub async fn delete_event(
        &self,
        event_id: &str,
        requester: &str,
    ) -> Result<DeleteReport, SyncError> {
        let event = self
            .store
            .event(event_id)?
            .ok_or_else(|| SyncError::EventNotFound(event_id.to_string()))?;

        if event.owner != requester {
            return Err(SyncError::Forbidden(event_id.to_string()));
        }

        let mut remote_warning = None;
        if event.source == EventSource::External {
            if let Some(ref external_id) = event.external_id {
                remote_warning = self.try_remote_delete(requester, external_id).await;
            }
        }

        self.store.delete_event(event_id)?;
        Ok(DeleteReport { remote_warning })
    }

    /// Attempt the remote delete, mapping every failure mode to an
    /// optional warning. Provider NotFound means already satisfied.
    async fn try_remote_delete(&self, owner: &str, external_id: &str) -> Option<String> {
        let credential = match self.tokens.ensure_credential(owner).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                return Some("no calendar account connected; remote copy left in place".to_string())
            }
            Err(e) => return Some(format!("credential lookup failed: {e}")),
        };

        match self.remote.delete(external_id, &credential).await {
            Ok(RemoteDelete::Deleted) | Ok(RemoteDelete::NotFound) => None,
            Err(e) => {
                tracing::warn!("remote delete of '{}' failed: {}", external_id, e);
                Some(format!("remote delete failed: {e}"))
            }
        }
    }
}
