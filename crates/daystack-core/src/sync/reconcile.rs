//! Pull phase: reconcile a window of remote events into the local store.

use crate::error::SyncError;
use crate::storage::{CredentialRecord, Store};
use crate::sync::remote::{RemoteCalendar, RemoteEvent};
use crate::sync::types::SyncWindow;

/// Pulls a time window from the provider and upserts each entry into
/// the local store, keyed by external id.
pub struct ReconciliationEngine<'a, R: RemoteCalendar> {
    store: &'a Store,
    remote: &'a R,
}

impl<'a, R: RemoteCalendar> ReconciliationEngine<'a, R> {
    pub fn new(store: &'a Store, remote: &'a R) -> Self {
        Self { store, remote }
    }

    /// Reconcile one window for `owner`, returning the number of remote
    /// events applied.
    ///
    /// A failed listing call is a whole-phase failure: nothing is
    /// upserted and the error propagates. Once the listing succeeded,
    /// per-item upserts are independent and idempotent; an item that
    /// fails to persist is logged and skipped, and upserts already
    /// applied stay applied.
    pub async fn reconcile(
        &self,
        owner: &str,
        window: &SyncWindow,
        credential: &CredentialRecord,
    ) -> Result<usize, SyncError> {
        let remote_events = self.remote.list(window, credential).await?;

        let mut synced = 0;
        for remote_event in &remote_events {
            match self.apply(owner, remote_event) {
                Ok(()) => synced += 1,
                Err(e) => {
                    tracing::warn!("skipping remote event '{}': {}", remote_event.id, e);
                }
            }
        }

        tracing::debug!("reconciled {} of {} remote events for '{}'", synced, remote_events.len(), owner);
        Ok(synced)
    }

    fn apply(&self, owner: &str, remote_event: &RemoteEvent) -> Result<(), SyncError> {
        self.store.upsert_external_event(owner, remote_event)?;
        Ok(())
    }
}
