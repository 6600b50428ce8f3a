//! Local calendar event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a local event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventSource {
    /// Created by direct user action in the dashboard.
    Local,
    /// Created or updated by reconciliation from the provider.
    External,
}

/// The system's own record of a calendar entry, independent of its
/// remote mirror.
///
/// `external_id` is unique per owner when present and is the sole upsert
/// key during reconciliation. An event is either Local-Only
/// (`external_id` is None) or Linked; once linked it stays linked until
/// the row is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalEvent {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    /// Identifier assigned by the provider, if this event is linked.
    pub external_id: Option<String>,
    pub source: EventSource,
    pub created_at: DateTime<Utc>,
}

impl LocalEvent {
    /// Create a user-authored event with no remote linkage yet.
    pub fn new(owner: &str, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            title: title.to_string(),
            description: None,
            location: None,
            start,
            end,
            all_day: false,
            external_id: None,
            source: EventSource::Local,
            created_at: Utc::now(),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.external_id.is_some()
    }
}
