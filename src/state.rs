//! Application state wiring

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{CredentialCache, OAuthTokenClient};
use crate::checks::CheckRegistry;
use crate::client::HttpFhirBackend;
use crate::config::AppConfig;
use crate::error::{CheckError, Result};
use crate::pipeline::ValidationPipeline;

/// Shared application state
///
/// One credential cache per downstream server; the caches are the only
/// mutable state shared between requests.
pub struct AppState {
    /// Service configuration
    pub config: AppConfig,

    /// Validation pipeline
    pub pipeline: ValidationPipeline,
}

impl AppState {
    /// Wire up the shared HTTP client, credential caches, and pipeline.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.timeout))
            .build()
            .map_err(|e| CheckError::Internal(format!("failed to build HTTP client: {e}")))?;

        let token_client = Arc::new(OAuthTokenClient::new(http.clone()));

        let data_credentials = Arc::new(CredentialCache::new(
            token_client.clone(),
            config.checks.fhir_server.clone(),
        ));
        let data_backend = Arc::new(HttpFhirBackend::new(
            http.clone(),
            config.checks.fhir_server.endpoint.clone(),
            data_credentials,
        ));

        let terminology_credentials = Arc::new(CredentialCache::new(
            token_client,
            config.checks.terminology_server.clone(),
        ));
        let terminology_backend = Arc::new(HttpFhirBackend::new(
            http,
            config.checks.terminology_server.endpoint.clone(),
            terminology_credentials,
        ));

        Ok(Self {
            config: config.clone(),
            pipeline: ValidationPipeline::new(
                data_backend,
                terminology_backend,
                CheckRegistry::with_builtin_checks(),
            ),
        })
    }

    /// State around an externally assembled pipeline; tests substitute fake
    /// backends here.
    pub fn with_pipeline(config: AppConfig, pipeline: ValidationPipeline) -> Self {
        Self { config, pipeline }
    }
}
