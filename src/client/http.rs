//! reqwest-backed FHIR server client

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;

use crate::auth::CredentialSource;
use crate::client::{FhirBackend, FHIR_JSON};
use crate::error::{CheckError, Result};
use crate::types::{ActivityDefinition, Bundle};

/// HTTP client for one configured backend endpoint.
///
/// Every request is authenticated through the injected credential source.
/// The shared reqwest client carries the bounded per-call timeout, so a hung
/// downstream surfaces as a transport error instead of tying up a worker.
pub struct HttpFhirBackend {
    http: reqwest::Client,
    endpoint: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpFhirBackend {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    async fn authorized_get(
        &self,
        url: &str,
        query: Option<(&str, &str)>,
    ) -> Result<reqwest::Response> {
        let token = self.credentials.acquire(false).await?;
        let mut request = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, FHIR_JSON)
            .header(header::CONTENT_TYPE, FHIR_JSON);
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }
        request
            .send()
            .await
            .map_err(|e| CheckError::Transport(format!("error connecting to {url}: {e}")))
    }
}

#[async_trait]
impl FhirBackend for HttpFhirBackend {
    async fn read(&self, resource_type: &str, id: &str) -> Result<Value> {
        let url = format!("{}/{}/{}", self.endpoint, resource_type, id);
        tracing::debug!(url = %url, "fetching resource");

        let response = self.authorized_get(&url, None).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Transport(format!(
                "error fetching resource type {resource_type} with id '{id}': {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CheckError::Transport(format!("malformed resource body from {url}: {e}")))
    }

    async fn search_activity_definitions(&self, canonical_url: &str) -> Result<Bundle> {
        let url = format!("{}/{}", self.endpoint, ActivityDefinition::RESOURCE_TYPE);
        tracing::debug!(url = %url, canonical = %canonical_url, "searching ActivityDefinition");

        let response = self.authorized_get(&url, Some(("url", canonical_url))).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Transport(format!(
                "ActivityDefinition search returned {status}: {body}"
            )));
        }

        response
            .json::<Bundle>()
            .await
            .map_err(|e| CheckError::Transport(format!("malformed search bundle from {url}: {e}")))
    }
}

impl std::fmt::Debug for HttpFhirBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFhirBackend")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
