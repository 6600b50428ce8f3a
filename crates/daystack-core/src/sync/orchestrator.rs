//! Top-level sync pass: pull then push.

use chrono::NaiveTime;

use crate::error::SyncError;
use crate::storage::Store;
use crate::sync::project::TaskEventProjector;
use crate::sync::reconcile::ReconciliationEngine;
use crate::sync::remote::RemoteCalendar;
use crate::sync::token_manager::TokenLifecycleManager;
use crate::sync::types::{SyncSummary, SyncWindow};

/// Sequences one full sync invocation for an owner: ensure a usable
/// credential, reconcile the pull window, then project unsynced tasks.
///
/// The phases are independent. Neither rolls the other back and a
/// whole-phase failure is reported in the summary next to the other
/// phase's count, not as a single transactional outcome.
pub struct SyncOrchestrator<'a, R: RemoteCalendar> {
    store: &'a Store,
    remote: &'a R,
    tokens: &'a TokenLifecycleManager<'a>,
    window: SyncWindow,
    default_due_time: NaiveTime,
}

impl<'a, R: RemoteCalendar> SyncOrchestrator<'a, R> {
    pub fn new(
        store: &'a Store,
        remote: &'a R,
        tokens: &'a TokenLifecycleManager<'a>,
        window: SyncWindow,
        default_due_time: NaiveTime,
    ) -> Self {
        Self {
            store,
            remote,
            tokens,
            window,
            default_due_time,
        }
    }

    /// Run one pull+push pass for `owner`.
    ///
    /// Errors only when the owner never connected an account; everything
    /// else is reported per-phase in the summary.
    pub async fn sync(&self, owner: &str) -> Result<SyncSummary, SyncError> {
        let credential = self
            .tokens
            .ensure_credential(owner)
            .await?
            .ok_or_else(|| SyncError::NotConnected {
                owner: owner.to_string(),
            })?;

        let mut summary = SyncSummary::default();

        let reconciler = ReconciliationEngine::new(self.store, self.remote);
        match reconciler.reconcile(owner, &self.window, &credential).await {
            Ok(synced) => summary.synced_events = synced,
            Err(e) => {
                tracing::warn!("pull phase failed for '{}': {}", owner, e);
                summary.pull_error = Some(e.to_string());
            }
        }

        let projector = TaskEventProjector::new(self.store, self.remote, self.default_due_time);
        match projector.project_all(owner, &credential).await {
            Ok(synced) => summary.synced_tasks = synced,
            Err(e) => {
                tracing::warn!("push phase failed for '{}': {}", owner, e);
                summary.push_error = Some(e.to_string());
            }
        }

        Ok(summary)
    }
}
