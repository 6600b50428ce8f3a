//! # Daystack Core Library
//!
//! Core business logic for the Daystack productivity dashboard. The
//! dashboard itself (tasks, habits, notes, goals) is a thin layer over
//! this library; the interesting part lives in the calendar sync engine,
//! which keeps the local event/task store consistent with an
//! independently-mutable Google Calendar account.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite-based event/task/credential storage and
//!   TOML-based configuration
//! - **Integrations**: OAuth2 token lifecycle and the Google Calendar
//!   REST client
//! - **Sync**: pull (reconciliation), push (task projection), deletion
//!   mirroring and the orchestrator that sequences them
//!
//! ## Key Components
//!
//! - [`Store`]: event, task and credential persistence
//! - [`Config`]: application configuration management
//! - [`RemoteCalendar`]: trait boundary to the calendar provider
//! - [`SyncEngine`]: application-facing sync facade

pub mod error;
pub mod event;
pub mod integrations;
pub mod storage;
pub mod sync;
pub mod task;

pub use error::SyncError;
pub use event::{EventSource, LocalEvent};
pub use integrations::google::GoogleCalendarClient;
pub use integrations::oauth::{OAuthConfig, OAuthTokens};
pub use storage::{Config, CredentialRecord, Store};
pub use sync::{
    DeleteReport, RemoteCalendar, RemoteDelete, RemoteEvent, SyncEngine, SyncStatus, SyncSummary,
    SyncWindow,
};
pub use task::{Task, TaskStatus};
