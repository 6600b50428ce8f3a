//! Core types for calendar synchronization.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bounded time window a sync pass operates over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// Window spanning `days_back` before now to `days_forward` after.
    pub fn around_now(days_back: i64, days_forward: i64) -> Self {
        let now = Utc::now();
        Self {
            start: now - Duration::days(days_back),
            end: now + Duration::days(days_forward),
        }
    }
}

/// Result of one full sync pass. The two phases are reported
/// independently; a failed phase leaves its count at whatever was
/// applied before the failure and records the error, without touching
/// the other phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Remote events upserted during the pull phase.
    pub synced_events: usize,
    /// Tasks projected to remote events during the push phase.
    pub synced_tasks: usize,
    /// Whole-phase pull failure (e.g. the listing call was rejected).
    pub pull_error: Option<String>,
    /// Whole-phase push failure (e.g. the selection query failed).
    pub push_error: Option<String>,
}

/// Outcome of a coordinated event deletion. The local row is always
/// gone by the time this is returned; `remote_warning` records a
/// best-effort remote delete that did not go through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteReport {
    pub remote_warning: Option<String>,
}

/// Current sync state for one owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Whether the owner has a connected calendar account.
    pub connected: bool,
    /// Last completed sync pass, if any.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Tasks currently eligible for projection.
    pub pending_tasks: usize,
}
