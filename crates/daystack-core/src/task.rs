//! Task model.
//!
//! Tasks are plain dashboard rows; the sync-relevant part is the optional
//! due date/time pair and the `external_event_id` link recorded when a
//! task has been projected to the calendar provider.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Open,
    Done,
}

/// A task owned by one dashboard user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub owner: String,
    pub title: String,
    /// Calendar day the task is due, if any. A task is only eligible for
    /// projection once it has a due date.
    pub due_date: Option<NaiveDate>,
    /// Time of day the task is due. Stored independently of the date; a
    /// task may carry a time with no date, which never projects.
    pub due_time: Option<NaiveTime>,
    pub status: TaskStatus,
    /// Provider id of the event this task was projected to. Set once on
    /// successful projection and never cleared automatically, so a task
    /// is projected at most once.
    pub external_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new open task for `owner`.
    pub fn new(owner: &str, title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            title: title.to_string(),
            due_date: None,
            due_time: None,
            status: TaskStatus::Open,
            external_event_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_due(mut self, date: NaiveDate, time: Option<NaiveTime>) -> Self {
        self.due_date = Some(date);
        self.due_time = time;
        self
    }

    /// Whether a projection pass would select this task.
    pub fn needs_projection(&self) -> bool {
        self.due_date.is_some() && self.external_event_id.is_none()
    }
}
