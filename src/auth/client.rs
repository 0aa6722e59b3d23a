//! Client-credentials token endpoint client

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::BackendSettings;
use crate::error::{CheckError, Result};

/// Raw reply from a client-credentials token endpoint.
///
/// Both fields are optional at the wire level; the credential cache treats a
/// missing or empty one as fatal.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Issues a client-credentials grant against a backend's token endpoint.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn fetch_token(&self, settings: &BackendSettings) -> Result<TokenResponse>;
}

/// OAuth2 token client over the shared HTTP client.
pub struct OAuthTokenClient {
    http: reqwest::Client,
}

impl OAuthTokenClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TokenEndpoint for OAuthTokenClient {
    async fn fetch_token(&self, settings: &BackendSettings) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&settings.auth_endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                CheckError::Auth(format!(
                    "error contacting token endpoint {}: {e}",
                    settings.auth_endpoint
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED && body.contains("unauthorized_client") {
                tracing::error!(
                    endpoint = %settings.auth_endpoint,
                    client_id = %settings.client_id,
                    "invalid client credentials at token endpoint"
                );
            }
            return Err(CheckError::Auth(format!(
                "token endpoint {} returned {status}: {body}",
                settings.auth_endpoint
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| CheckError::Auth(format!("malformed token response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_response_deserialization() {
        let response: TokenResponse =
            serde_json::from_value(json!({ "access_token": "abc", "expires_in": 3600 })).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("abc"));
        assert_eq!(response.expires_in, Some(3600));

        let partial: TokenResponse = serde_json::from_value(json!({ "access_token": "abc" })).unwrap();
        assert!(partial.expires_in.is_none());
    }
}
