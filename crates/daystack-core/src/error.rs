//! Error types for daystack-core.
//!
//! One taxonomy covers the whole sync engine. Per-item failures during a
//! sync pass are logged and counted rather than propagated; only
//! whole-phase failures (a rejected listing call, a broken store) surface
//! as a `SyncError` to the caller.

use thiserror::Error;

/// Error type shared across the sync engine and its storage layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The owner never connected a calendar account. Operations that need
    /// the provider short-circuit with this instead of attempting calls.
    #[error("no calendar account connected for '{owner}'")]
    NotConnected { owner: String },

    /// No local event with the given id.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// The requester does not own the event.
    #[error("event {0} belongs to another owner")]
    Forbidden(String),

    /// Token refresh was attempted and rejected. Non-fatal on the sync
    /// path: the stale credential is used and the dependent remote call
    /// reports the real failure.
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// Non-success response from the calendar provider.
    #[error("calendar API error: {0}")]
    Remote(String),

    /// Transport-level failure talking to the provider.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local persistence failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// OAuth connect flow failure (browser/callback/exchange).
    #[error("authorization failed: {0}")]
    Authorization(String),
}
