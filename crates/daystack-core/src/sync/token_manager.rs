//! Credential lifecycle ahead of remote calls.
//!
//! Every sync entry point asks here for a usable credential before
//! touching the provider, so a refresh always happens-before the remote
//! call that depends on it.

use chrono::Utc;

use crate::error::SyncError;
use crate::integrations::oauth::{self, OAuthConfig};
use crate::storage::{CredentialRecord, Store};

/// Decides when a stored credential needs refreshing, performs the
/// refresh and persists the merged result.
pub struct TokenLifecycleManager<'a> {
    store: &'a Store,
    oauth: OAuthConfig,
}

impl<'a> TokenLifecycleManager<'a> {
    pub fn new(store: &'a Store, oauth: OAuthConfig) -> Self {
        Self { store, oauth }
    }

    /// Return a credential for `owner`, refreshed if it is expiring.
    ///
    /// `None` means the owner never connected an account; callers
    /// short-circuit as not-connected instead of attempting calls.
    ///
    /// Refresh failure is non-fatal: the stale credential is returned
    /// and the next remote call reports the real failure.
    pub async fn ensure_credential(
        &self,
        owner: &str,
    ) -> Result<Option<CredentialRecord>, SyncError> {
        let Some(record) = self.store.credential(owner)? else {
            return Ok(None);
        };

        if !record.is_expiring(Utc::now()) {
            return Ok(Some(record));
        }

        let Some(refresh_token) = record.refresh_token.clone() else {
            tracing::warn!(
                "credential for '{}' is expiring and has no refresh token",
                owner
            );
            return Ok(Some(record));
        };

        match oauth::refresh(&self.oauth, &refresh_token).await {
            Ok(fresh) => {
                let merged = record.merge_refresh(&fresh);
                self.store.put_credential(&merged)?;
                Ok(Some(merged))
            }
            Err(e) => {
                tracing::warn!("token refresh failed for '{}': {}", owner, e);
                Ok(Some(record))
            }
        }
    }
}
