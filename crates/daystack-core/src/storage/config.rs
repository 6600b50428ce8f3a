//! TOML-based application configuration.
//!
//! Stores:
//! - The owner name used by the single-user CLI
//! - Google OAuth client credentials and the redirect port
//! - Sync tuning: default due time for tasks without one, and the pull
//!   window around "now"
//!
//! Configuration is stored at `~/.config/daystack/config.toml`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::SyncError;

/// General configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Owner name all CLI operations act as.
    #[serde(default = "default_owner")]
    pub owner: String,
}

/// Google OAuth client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Localhost port the OAuth redirect lands on.
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

/// Sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Time of day assumed for tasks that have a due date but no due
    /// time, as "HH:MM".
    #[serde(default = "default_due_time")]
    pub default_due_time: String,
    /// Days before now included in the pull window.
    #[serde(default = "default_days_back")]
    pub window_days_back: i64,
    /// Days after now included in the pull window.
    #[serde(default = "default_days_forward")]
    pub window_days_forward: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daystack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_owner() -> String {
    "local".to_string()
}

fn default_redirect_port() -> u16 {
    19824
}

fn default_due_time() -> String {
    "09:00".to_string()
}

fn default_days_back() -> i64 {
    30
}

fn default_days_forward() -> i64 {
    60
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_port: default_redirect_port(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_due_time: default_due_time(),
            window_days_back: default_days_back(),
            window_days_forward: default_days_forward(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            google: GoogleConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, falling back to defaults if the
    /// file does not exist.
    pub fn load() -> Result<Self, SyncError> {
        let path = data_dir()?.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<(), SyncError> {
        let path = data_dir()?.join("config.toml");
        let raw = toml::to_string_pretty(self).map_err(|e| SyncError::Config(e.to_string()))?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    /// Parsed default due time, e.g. 09:00.
    pub fn default_due_time(&self) -> NaiveTime {
        NaiveTime::parse_from_str(&self.sync.default_due_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(9, 0, 0).unwrap())
    }
}
