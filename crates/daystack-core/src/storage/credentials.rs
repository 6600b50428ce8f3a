//! Per-owner OAuth credential record.
//!
//! The store always holds the most recently issued access token. Merging
//! a refresh response is an explicit function here rather than an
//! incidental default: a refresh response that omits a refresh token must
//! not erase the one already stored, or future refreshes for that owner
//! would be permanently broken.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::integrations::oauth::OAuthTokens;

/// How close to expiry a credential may get before we refresh it ahead
/// of a dependent remote call.
pub const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// Persisted OAuth tokens for one dashboard owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub owner: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Build a record from a completed authorization flow.
    pub fn from_tokens(owner: &str, tokens: &OAuthTokens) -> Self {
        Self {
            owner: owner.to_string(),
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: tokens.expires_at,
        }
    }

    /// Whether the access token is expiring as of `now`.
    ///
    /// Unknown expiry is treated as expiring, so we refresh rather than
    /// gamble on a token we cannot reason about.
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < now + Duration::minutes(EXPIRY_MARGIN_MINUTES),
            None => true,
        }
    }

    /// Merge a refresh response into this record.
    ///
    /// New access token and expiry always win; the refresh token is only
    /// replaced if the response actually carried one.
    pub fn merge_refresh(&self, fresh: &OAuthTokens) -> CredentialRecord {
        CredentialRecord {
            owner: self.owner.clone(),
            access_token: fresh.access_token.clone(),
            refresh_token: fresh
                .refresh_token
                .clone()
                .or_else(|| self.refresh_token.clone()),
            expires_at: fresh.expires_at,
        }
    }
}
