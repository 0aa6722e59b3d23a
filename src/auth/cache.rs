//! Expiring bearer-credential cache shared across outbound calls

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::auth::client::TokenEndpoint;
use crate::config::BackendSettings;
use crate::error::{CheckError, Result};

/// Credentials are renewed this long before the issuer-reported expiry.
const EARLY_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Process-scoped source of bearer credentials for one backend.
///
/// Injected into resolvers so tests can substitute a fake.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Return a valid bearer token, refreshing when stale or forced.
    async fn acquire(&self, force_refresh: bool) -> Result<String>;

    /// Drop the cached credential; the next acquire refreshes.
    async fn invalidate(&self);
}

#[derive(Debug, Clone)]
struct CachedCredential {
    value: String,
    expires_at: Instant,
}

/// One cached credential with expiry, refreshed via a token endpoint.
pub struct CredentialCache {
    endpoint: Arc<dyn TokenEndpoint>,
    settings: BackendSettings,
    current: Mutex<Option<CachedCredential>>,
}

impl CredentialCache {
    pub fn new(endpoint: Arc<dyn TokenEndpoint>, settings: BackendSettings) -> Self {
        Self {
            endpoint,
            settings,
            current: Mutex::new(None),
        }
    }

    async fn refresh(&self) -> Result<CachedCredential> {
        let response = self.endpoint.fetch_token(&self.settings).await?;
        let value = response.access_token.filter(|token| !token.is_empty());
        let expires_in = response.expires_in.filter(|seconds| *seconds > 0);
        let (value, expires_in) = match (value, expires_in) {
            (Some(value), Some(expires_in)) => (value, expires_in),
            _ => {
                return Err(CheckError::Auth(
                    "invalid token response: missing 'access_token' or 'expires_in'".to_string(),
                ))
            }
        };

        let lifetime = Duration::from_secs(expires_in).saturating_sub(EARLY_REFRESH_MARGIN);
        Ok(CachedCredential {
            value,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl CredentialSource for CredentialCache {
    async fn acquire(&self, force_refresh: bool) -> Result<String> {
        // The lock is held across the refresh call: at most one refresh is in
        // flight process-wide, and waiting callers observe either the
        // pre-refresh or the renewed value, never a partial update. Waiters
        // pay the full refresh latency; acceptable at this service's volume.
        let mut current = self.current.lock().await;

        let stale = match current.as_ref() {
            Some(credential) => Instant::now() >= credential.expires_at,
            None => true,
        };

        if stale || force_refresh {
            let renewed = self.refresh().await?;
            tracing::debug!(
                endpoint = %self.settings.auth_endpoint,
                "refreshed bearer credential"
            );
            *current = Some(renewed);
        }

        match current.as_ref() {
            Some(credential) => Ok(credential.value.clone()),
            None => Err(CheckError::Internal(
                "credential cache empty after refresh".to_string(),
            )),
        }
    }

    async fn invalidate(&self) {
        *self.current.lock().await = None;
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("auth_endpoint", &self.settings.auth_endpoint)
            .finish_non_exhaustive()
    }
}
