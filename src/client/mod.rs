//! Outbound FHIR server access

pub mod http;

pub use http::HttpFhirBackend;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::Bundle;

/// Content type used for every exchange with a FHIR endpoint.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Authenticated access to one downstream FHIR-speaking server.
///
/// The resolvers talk to this seam only; tests substitute fakes.
#[async_trait]
pub trait FhirBackend: Send + Sync {
    /// Fetch a single resource by type and id.
    async fn read(&self, resource_type: &str, id: &str) -> Result<Value>;

    /// Search ActivityDefinition resources by canonical URL.
    async fn search_activity_definitions(&self, canonical_url: &str) -> Result<Bundle>;
}
