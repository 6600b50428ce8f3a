//! Application-facing sync facade.
//!
//! The rest of the dashboard (and the CLI) talks to this type: event and
//! task writes with best-effort remote mirroring, coordinated deletion,
//! full sync passes and connection management.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::SyncError;
use crate::event::LocalEvent;
use crate::integrations::oauth::{self, OAuthConfig};
use crate::storage::{Config, CredentialRecord, Store};
use crate::sync::delete::DeletionCoordinator;
use crate::sync::orchestrator::SyncOrchestrator;
use crate::sync::project::TaskEventProjector;
use crate::sync::remote::{NewRemoteEvent, RemoteCalendar};
use crate::sync::token_manager::TokenLifecycleManager;
use crate::sync::types::{DeleteReport, SyncStatus, SyncSummary, SyncWindow};
use crate::task::Task;

/// Input for a user-created event.
#[derive(Debug, Clone)]
pub struct NewEventInput {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Sync engine facade over one store and one remote provider.
pub struct SyncEngine<R: RemoteCalendar> {
    store: Store,
    remote: R,
    oauth: OAuthConfig,
    config: Config,
}

impl<R: RemoteCalendar> SyncEngine<R> {
    pub fn new(store: Store, remote: R, config: Config) -> Self {
        let oauth = OAuthConfig::google(&config.google);
        Self {
            store,
            remote,
            oauth,
            config,
        }
    }

    /// Facade with a non-default OAuth endpoint config (used in tests).
    pub fn with_oauth(store: Store, remote: R, config: Config, oauth: OAuthConfig) -> Self {
        Self {
            store,
            remote,
            oauth,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn token_manager(&self) -> TokenLifecycleManager<'_> {
        TokenLifecycleManager::new(&self.store, self.oauth.clone())
    }

    fn default_window(&self) -> SyncWindow {
        SyncWindow::around_now(
            self.config.sync.window_days_back,
            self.config.sync.window_days_forward,
        )
    }

    fn default_due_time(&self) -> NaiveTime {
        self.config.default_due_time()
    }

    // === Connection management ===

    /// Run the OAuth connect flow for `owner` and persist the resulting
    /// credential.
    pub async fn connect(&self, owner: &str) -> Result<(), SyncError> {
        let tokens = oauth::authorize(&self.oauth).await?;
        let record = CredentialRecord::from_tokens(owner, &tokens);
        self.store.put_credential(&record)?;
        tracing::info!("connected calendar account for '{}'", owner);
        Ok(())
    }

    /// Drop the stored credential for `owner`.
    pub fn disconnect(&self, owner: &str) -> Result<(), SyncError> {
        self.store.delete_credential(owner)?;
        Ok(())
    }

    /// Whether `owner` has a connected account.
    pub fn is_connected(&self, owner: &str) -> Result<bool, SyncError> {
        Ok(self.store.credential(owner)?.is_some())
    }

    // === Events ===

    /// List an owner's events in a window.
    pub fn list_events(
        &self,
        owner: &str,
        window: &SyncWindow,
    ) -> Result<Vec<LocalEvent>, SyncError> {
        self.store.events_in_window(owner, window)
    }

    /// Create a local event with best-effort remote mirroring.
    ///
    /// The local insert always succeeds for the user. If a credential is
    /// available and the remote insert goes through, the event becomes
    /// Linked; otherwise it stays Local-Only and the failure is logged.
    pub async fn create_event(
        &self,
        owner: &str,
        input: NewEventInput,
    ) -> Result<LocalEvent, SyncError> {
        let mut event = LocalEvent::new(owner, &input.title, input.start, input.end);
        event.description = input.description;
        event.location = input.location;
        self.store.insert_event(&event)?;

        match self.mirror_event(owner, &event).await {
            Ok(Some(external_id)) => {
                self.store.link_event(&event.id, &external_id)?;
                event.external_id = Some(external_id);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("remote mirror of event '{}' failed: {}", event.id, e);
            }
        }

        Ok(event)
    }

    /// Push a just-created event to the provider. `Ok(None)` means the
    /// owner is not connected; no call was attempted.
    async fn mirror_event(
        &self,
        owner: &str,
        event: &LocalEvent,
    ) -> Result<Option<String>, SyncError> {
        let Some(credential) = self.token_manager().ensure_credential(owner).await? else {
            return Ok(None);
        };
        let created = self
            .remote
            .insert(
                &NewRemoteEvent {
                    title: event.title.clone(),
                    description: event.description.clone(),
                    start: event.start,
                    end: event.end,
                },
                &credential,
            )
            .await?;
        Ok(Some(created.id))
    }

    /// Delete an event with best-effort remote mirroring.
    pub async fn delete_event(
        &self,
        event_id: &str,
        requester: &str,
    ) -> Result<DeleteReport, SyncError> {
        let tokens = self.token_manager();
        let coordinator = DeletionCoordinator::new(&self.store, &self.remote, &tokens);
        coordinator.delete_event(event_id, requester).await
    }

    // === Tasks ===

    /// Create a task, projecting it immediately when it has a due date.
    ///
    /// The fast-path projection is best-effort: its failure never fails
    /// task creation and the next batch pass picks the task up again.
    pub async fn create_task(
        &self,
        owner: &str,
        title: &str,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> Result<Task, SyncError> {
        let mut task = Task::new(owner, title);
        task.due_date = due_date;
        task.due_time = due_time;
        self.store.insert_task(&task)?;

        if task.needs_projection() {
            if let Err(e) = self.project_now(owner, &task).await {
                tracing::warn!("immediate projection of task '{}' failed: {}", task.id, e);
            } else if let Some(updated) = self.store.task(&task.id)? {
                task = updated;
            }
        }

        Ok(task)
    }

    async fn project_now(&self, owner: &str, task: &Task) -> Result<(), SyncError> {
        let Some(credential) = self.token_manager().ensure_credential(owner).await? else {
            return Ok(());
        };
        let projector =
            TaskEventProjector::new(&self.store, &self.remote, self.default_due_time());
        projector.project_task(task, &credential).await
    }

    /// List an owner's tasks.
    pub fn list_tasks(&self, owner: &str) -> Result<Vec<Task>, SyncError> {
        self.store.tasks(owner)
    }

    // === Sync ===

    /// Run one full pull+push pass for `owner`.
    pub async fn sync(&self, owner: &str) -> Result<SyncSummary, SyncError> {
        let tokens = self.token_manager();
        let orchestrator = SyncOrchestrator::new(
            &self.store,
            &self.remote,
            &tokens,
            self.default_window(),
            self.default_due_time(),
        );
        let summary = orchestrator.sync(owner).await?;
        self.store.set_last_synced_at(owner, Utc::now())?;
        Ok(summary)
    }

    /// Current sync status for `owner`.
    pub fn status(&self, owner: &str) -> Result<SyncStatus, SyncError> {
        Ok(SyncStatus {
            connected: self.is_connected(owner)?,
            last_synced_at: self.store.last_synced_at(owner)?,
            pending_tasks: self.store.unsynced_tasks(owner)?.len(),
        })
    }
}
