pub mod config;
pub mod credentials;
pub mod store;

pub use config::Config;
pub use credentials::CredentialRecord;
pub use store::{Store, UpsertOutcome};

use std::path::PathBuf;

/// Returns `~/.config/daystack[-dev]/` based on DAYSTACK_ENV.
///
/// Set DAYSTACK_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, crate::SyncError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYSTACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daystack-dev")
    } else {
        base_dir.join("daystack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
