//! Canonical-URL resolution with cardinality disambiguation

use std::sync::Arc;

use serde_json::Value;

use crate::client::FhirBackend;
use crate::error::{CheckError, Result};
use crate::types::ActivityDefinition;

/// Resolves a canonical URL to exactly one ActivityDefinition on the
/// terminology server.
pub struct CanonicalResolver {
    backend: Arc<dyn FhirBackend>,
}

impl CanonicalResolver {
    pub fn new(backend: Arc<dyn FhirBackend>) -> Self {
        Self { backend }
    }

    /// Search by canonical URL and classify the bundle cardinality.
    ///
    /// Zero matches and multiple matches are both failure states; the
    /// resolver never picks the first of many.
    pub async fn resolve(&self, canonical_url: &str) -> Result<ActivityDefinition> {
        let bundle = self.backend.search_activity_definitions(canonical_url).await?;

        match bundle.total {
            0 => Err(CheckError::NotFound {
                canonical: canonical_url.to_string(),
            }),
            1 => {
                let resource = bundle.into_first_resource().ok_or_else(|| {
                    CheckError::Transport(format!(
                        "search bundle for '{canonical_url}' reported one match but carried no resource"
                    ))
                })?;

                let resource_type = resource
                    .get("resourceType")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if resource_type != ActivityDefinition::RESOURCE_TYPE {
                    return Err(CheckError::Resolution(format!(
                        "Task instantiatesCanonical did not resolve to an ActivityDefinition. Got '{resource_type}'"
                    )));
                }

                serde_json::from_value(resource).map_err(|e| {
                    CheckError::Transport(format!(
                        "malformed ActivityDefinition for '{canonical_url}': {e}"
                    ))
                })
            }
            _ => Err(CheckError::Ambiguous {
                canonical: canonical_url.to_string(),
            }),
        }
    }
}
