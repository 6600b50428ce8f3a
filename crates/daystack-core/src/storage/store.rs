//! SQLite-based storage for events, tasks and credentials.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::credentials::CredentialRecord;
use crate::error::SyncError;
use crate::event::{EventSource, LocalEvent};
use crate::sync::types::SyncWindow;
use crate::sync::remote::RemoteEvent;
use crate::task::{Task, TaskStatus};
use uuid::Uuid;

// === Helper Functions ===

/// Format event source for database storage
fn format_source(source: EventSource) -> &'static str {
    match source {
        EventSource::Local => "LOCAL",
        EventSource::External => "EXTERNAL",
    }
}

/// Parse event source from database string
fn parse_source(source_str: &str) -> EventSource {
    match source_str {
        "EXTERNAL" => EventSource::External,
        _ => EventSource::Local,
    }
}

/// Format task status for database storage
fn format_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "OPEN",
        TaskStatus::Done => "DONE",
    }
}

/// Parse task status from database string
fn parse_status(status_str: &str) -> TaskStatus {
    match status_str {
        "DONE" => TaskStatus::Done,
        _ => TaskStatus::Open,
    }
}

/// Parse an RFC3339 timestamp stored in column `idx`. A row that fails
/// to parse is surfaced as a conversion error, not papered over.
fn parse_datetime(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Build a LocalEvent from a database row
fn row_to_event(row: &rusqlite::Row) -> Result<LocalEvent, rusqlite::Error> {
    let start_str: String = row.get(5)?;
    let end_str: String = row.get(6)?;
    let source_str: String = row.get(9)?;
    let created_str: String = row.get(10)?;

    Ok(LocalEvent {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        start: parse_datetime(5, &start_str)?,
        end: parse_datetime(6, &end_str)?,
        all_day: row.get(7)?,
        external_id: row.get(8)?,
        source: parse_source(&source_str),
        created_at: parse_datetime(10, &created_str)?,
    })
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let due_date_str: Option<String> = row.get(3)?;
    let due_time_str: Option<String> = row.get(4)?;
    let status_str: String = row.get(5)?;
    let created_str: String = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        due_date: due_date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        due_time: due_time_str.and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M:%S").ok()),
        status: parse_status(&status_str),
        external_event_id: row.get(6)?,
        created_at: parse_datetime(7, &created_str)?,
    })
}

/// Result of an externally-keyed event upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// SQLite database for event, task and credential storage.
///
/// All reads and writes are owner-scoped; each upsert is atomic at
/// single-record granularity keyed by the unique `(owner, external_id)`
/// pair, which makes reconciliation items safe to apply in any order.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database at `~/.config/daystack/daystack.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, SyncError> {
        let path = data_dir()?.join("daystack.db");
        let conn = Connection::open(path).map_err(SyncError::Storage)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory().map_err(SyncError::Storage)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                id          TEXT PRIMARY KEY,
                owner       TEXT NOT NULL,
                title       TEXT NOT NULL,
                description TEXT,
                location    TEXT,
                start_time  TEXT NOT NULL,
                end_time    TEXT NOT NULL,
                all_day     INTEGER NOT NULL DEFAULT 0,
                external_id TEXT,
                source      TEXT NOT NULL DEFAULT 'LOCAL',
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id                TEXT PRIMARY KEY,
                owner             TEXT NOT NULL,
                title             TEXT NOT NULL,
                due_date          TEXT,
                due_time          TEXT,
                status            TEXT NOT NULL DEFAULT 'OPEN',
                external_event_id TEXT,
                created_at        TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS credentials (
                owner         TEXT PRIMARY KEY,
                access_token  TEXT NOT NULL,
                refresh_token TEXT,
                expires_at    TEXT
            );

            CREATE TABLE IF NOT EXISTS sync_state (
                owner          TEXT PRIMARY KEY,
                last_synced_at TEXT NOT NULL
            );",
        )?;

        // Reconciliation dedup index: one local row per provider id per owner
        self.conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_events_external_unique
             ON events(owner, external_id)
             WHERE external_id IS NOT NULL",
            [],
        )?;

        Ok(())
    }

    // === Events ===

    /// Insert a new local event.
    pub fn insert_event(&self, event: &LocalEvent) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO events (id, owner, title, description, location, start_time, end_time, all_day, external_id, source, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                event.id,
                event.owner,
                event.title,
                event.description,
                event.location,
                event.start.to_rfc3339(),
                event.end.to_rfc3339(),
                event.all_day,
                event.external_id,
                format_source(event.source),
                event.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Fetch a single event by id.
    pub fn event(&self, id: &str) -> Result<Option<LocalEvent>, SyncError> {
        let event = self
            .conn
            .query_row(
                "SELECT id, owner, title, description, location, start_time, end_time, all_day, external_id, source, created_at
                 FROM events WHERE id = ?1",
                params![id],
                row_to_event,
            )
            .optional()?;
        Ok(event)
    }

    /// List an owner's events overlapping the window, ordered by start.
    pub fn events_in_window(
        &self,
        owner: &str,
        window: &SyncWindow,
    ) -> Result<Vec<LocalEvent>, SyncError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, title, description, location, start_time, end_time, all_day, external_id, source, created_at
             FROM events
             WHERE owner = ?1 AND end_time >= ?2 AND start_time <= ?3
             ORDER BY start_time ASC",
        )?;
        let rows = stmt.query_map(
            params![owner, window.start.to_rfc3339(), window.end.to_rfc3339()],
            row_to_event,
        )?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    /// Record the provider id on an event after a successful remote
    /// insert. Local-Only -> Linked; there is no transition back.
    pub fn link_event(&self, id: &str, external_id: &str) -> Result<(), SyncError> {
        self.conn.execute(
            "UPDATE events SET external_id = ?2 WHERE id = ?1",
            params![id, external_id],
        )?;
        Ok(())
    }

    /// Delete an event row. The local store is authoritative: deletion
    /// here never depends on the remote mirror's fate.
    pub fn delete_event(&self, id: &str) -> Result<(), SyncError> {
        self.conn
            .execute("DELETE FROM events WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Upsert a pulled remote event, keyed by `(owner, external_id)`.
    ///
    /// On conflict the mutable fields (title, description, location,
    /// times, all-day flag) are updated in place; otherwise a new row is
    /// created with source EXTERNAL and the reconciling user as owner.
    pub fn upsert_external_event(
        &self,
        owner: &str,
        remote: &RemoteEvent,
    ) -> Result<UpsertOutcome, SyncError> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM events WHERE owner = ?1 AND external_id = ?2",
                params![owner, remote.id],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE events
                     SET title = ?2, description = ?3, location = ?4,
                         start_time = ?5, end_time = ?6, all_day = ?7
                     WHERE id = ?1",
                    params![
                        id,
                        remote.title,
                        remote.description,
                        remote.location,
                        remote.start.to_rfc3339(),
                        remote.end.to_rfc3339(),
                        remote.all_day,
                    ],
                )?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO events (id, owner, title, description, location, start_time, end_time, all_day, external_id, source, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'EXTERNAL', ?10)",
                    params![
                        Uuid::new_v4().to_string(),
                        owner,
                        remote.title,
                        remote.description,
                        remote.location,
                        remote.start.to_rfc3339(),
                        remote.end.to_rfc3339(),
                        remote.all_day,
                        remote.id,
                        Utc::now().to_rfc3339(),
                    ],
                )?;
                Ok(UpsertOutcome::Created)
            }
        }
    }

    // === Tasks ===

    /// Insert a new task.
    pub fn insert_task(&self, task: &Task) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO tasks (id, owner, title, due_date, due_time, status, external_event_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.owner,
                task.title,
                task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                task.due_time.map(|t| t.format("%H:%M:%S").to_string()),
                format_status(task.status),
                task.external_event_id,
                task.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Fetch a single task by id.
    pub fn task(&self, id: &str) -> Result<Option<Task>, SyncError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, owner, title, due_date, due_time, status, external_event_id, created_at
                 FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// List all of an owner's tasks, newest first.
    pub fn tasks(&self, owner: &str) -> Result<Vec<Task>, SyncError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, title, due_date, due_time, status, external_event_id, created_at
             FROM tasks WHERE owner = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![owner], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Tasks eligible for projection: owned by `owner`, with a due date
    /// and no provider link yet. Once a task is linked it is never
    /// re-selected, which gives at-most-once projection.
    pub fn unsynced_tasks(&self, owner: &str) -> Result<Vec<Task>, SyncError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, title, due_date, due_time, status, external_event_id, created_at
             FROM tasks
             WHERE owner = ?1 AND due_date IS NOT NULL AND external_event_id IS NULL
             ORDER BY due_date ASC",
        )?;
        let rows = stmt.query_map(params![owner], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Record the provider event id on a task after successful
    /// projection.
    pub fn link_task(&self, task_id: &str, external_event_id: &str) -> Result<(), SyncError> {
        self.conn.execute(
            "UPDATE tasks SET external_event_id = ?2 WHERE id = ?1",
            params![task_id, external_event_id],
        )?;
        Ok(())
    }

    /// Update a task's completion status.
    pub fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), SyncError> {
        self.conn.execute(
            "UPDATE tasks SET status = ?2 WHERE id = ?1",
            params![task_id, format_status(status)],
        )?;
        Ok(())
    }

    // === Credentials ===

    /// Fetch the stored credential for an owner, if they ever connected.
    pub fn credential(&self, owner: &str) -> Result<Option<CredentialRecord>, SyncError> {
        let record = self
            .conn
            .query_row(
                "SELECT owner, access_token, refresh_token, expires_at
                 FROM credentials WHERE owner = ?1",
                params![owner],
                |row| {
                    let expires_str: Option<String> = row.get(3)?;
                    Ok(CredentialRecord {
                        owner: row.get(0)?,
                        access_token: row.get(1)?,
                        refresh_token: row.get(2)?,
                        expires_at: expires_str.and_then(|s| {
                            DateTime::parse_from_rfc3339(&s)
                                .map(|dt| dt.with_timezone(&Utc))
                                .ok()
                        }),
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Store (or replace) the credential for an owner. Last write wins;
    /// issuing a fresh token does not invalidate one already in flight.
    pub fn put_credential(&self, record: &CredentialRecord) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO credentials (owner, access_token, refresh_token, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(owner) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at",
            params![
                record.owner,
                record.access_token,
                record.refresh_token,
                record.expires_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Remove the stored credential for an owner (disconnect).
    pub fn delete_credential(&self, owner: &str) -> Result<(), SyncError> {
        self.conn
            .execute("DELETE FROM credentials WHERE owner = ?1", params![owner])?;
        Ok(())
    }

    // === Sync bookkeeping ===

    /// Timestamp of the owner's last completed sync pass, if any.
    pub fn last_synced_at(&self, owner: &str) -> Result<Option<DateTime<Utc>>, SyncError> {
        let value = self
            .conn
            .query_row(
                "SELECT last_synced_at FROM sync_state WHERE owner = ?1",
                params![owner],
                |row| {
                    let raw: String = row.get(0)?;
                    parse_datetime(0, &raw)
                },
            )
            .optional()?;
        Ok(value)
    }

    /// Record a completed sync pass for an owner.
    pub fn set_last_synced_at(&self, owner: &str, at: DateTime<Utc>) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO sync_state (owner, last_synced_at) VALUES (?1, ?2)
             ON CONFLICT(owner) DO UPDATE SET last_synced_at = excluded.last_synced_at",
            params![owner, at.to_rfc3339()],
        )?;
        Ok(())
    }
}
