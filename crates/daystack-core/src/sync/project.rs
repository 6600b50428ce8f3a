//! Push phase: project task deadlines to remote calendar events.
//!
//! Forward direction only. A task is selected while it has a due date
//! and no provider link; successful projection records the link, which
//! permanently removes the task from selection. There is no retry
//! queue: a failed task is simply still unselected-out on the next pass.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::SyncError;
use crate::storage::{CredentialRecord, Store};
use crate::sync::remote::{NewRemoteEvent, RemoteCalendar};
use crate::task::Task;

/// Fixed duration of a projected event.
pub const PROJECTED_EVENT_MINUTES: i64 = 30;

/// Start of the projected event: due date merged with due time, falling
/// back to `default_time` (09:00 unless configured otherwise), in the
/// user's local timezone.
pub fn projected_start(
    due_date: NaiveDate,
    due_time: Option<NaiveTime>,
    default_time: NaiveTime,
) -> DateTime<Utc> {
    let naive = due_date.and_time(due_time.unwrap_or(default_time));
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Nonexistent local time (DST gap): fall back to reading the
        // wall-clock value as UTC.
        None => DateTime::from_naive_utc_and_offset(naive, Utc),
    }
}

/// Pushes unsynced task deadlines to the provider.
pub struct TaskEventProjector<'a, R: RemoteCalendar> {
    store: &'a Store,
    remote: &'a R,
    default_due_time: NaiveTime,
}

impl<'a, R: RemoteCalendar> TaskEventProjector<'a, R> {
    pub fn new(store: &'a Store, remote: &'a R, default_due_time: NaiveTime) -> Self {
        Self {
            store,
            remote,
            default_due_time,
        }
    }

    /// Project every eligible task for `owner`, returning how many were
    /// linked. Per-task failures are logged and skipped; the unchanged
    /// selection predicate re-selects them on the next pass.
    pub async fn project_all(
        &self,
        owner: &str,
        credential: &CredentialRecord,
    ) -> Result<usize, SyncError> {
        let tasks = self.store.unsynced_tasks(owner)?;

        let mut synced = 0;
        for task in &tasks {
            match self.project_task(task, credential).await {
                Ok(()) => synced += 1,
                Err(e) => {
                    tracing::warn!("projection of task '{}' failed: {}", task.id, e);
                }
            }
        }
        Ok(synced)
    }

    /// Project a single task: insert the derived event at the provider
    /// and record the link. Also used as the immediate fast path at
    /// task-creation time, where the caller swallows the error.
    pub async fn project_task(
        &self,
        task: &Task,
        credential: &CredentialRecord,
    ) -> Result<(), SyncError> {
        let due_date = task
            .due_date
            .ok_or_else(|| SyncError::Config(format!("task '{}' has no due date", task.id)))?;

        let start = projected_start(due_date, task.due_time, self.default_due_time);
        let event = NewRemoteEvent {
            title: task.title.clone(),
            description: None,
            start,
            end: start + Duration::minutes(PROJECTED_EVENT_MINUTES),
        };

        let created = self.remote.insert(&event, credential).await?;
        self.store.link_task(&task.id, &created.id)?;
        Ok(())
    }
}
