//! Two-path Task focus resolution: contained anchor or remote fetch

use std::sync::Arc;

use serde_json::Value;

use crate::client::FhirBackend;
use crate::error::{CheckError, Result};
use crate::types::Task;

/// Parsed shape of a Task focus reference.
///
/// Only two shapes are valid: `#<id>` anchoring into `Task.contained`, and
/// `<Type>/<id>` fetched from the data server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusReference<'a> {
    Contained(&'a str),
    Remote { resource_type: &'a str, id: &'a str },
}

impl<'a> FocusReference<'a> {
    pub fn parse(reference: &'a str) -> Result<Self> {
        if let Some(id) = reference.strip_prefix('#') {
            if id.is_empty() {
                return Err(invalid_reference(reference));
            }
            return Ok(Self::Contained(id));
        }

        if let Some((resource_type, id)) = reference.split_once('/') {
            if resource_type.is_empty() || id.is_empty() {
                return Err(invalid_reference(reference));
            }
            return Ok(Self::Remote { resource_type, id });
        }

        Err(invalid_reference(reference))
    }
}

fn invalid_reference(reference: &str) -> CheckError {
    CheckError::Resolution(format!(
        "Invalid focus reference '{reference}': expected '#<id>' or '<Type>/<id>'"
    ))
}

/// Resolves the Task focus either from `contained` or from the data server.
pub struct ReferenceResolver {
    backend: Arc<dyn FhirBackend>,
}

impl ReferenceResolver {
    pub fn new(backend: Arc<dyn FhirBackend>) -> Self {
        Self { backend }
    }

    /// Resolve a focus reference against the Task.
    ///
    /// `Ok(None)` means the reference was well formed but matched nothing in
    /// `contained`; the pipeline reports that separately from a resolved
    /// resource of the wrong type. A missing reference and a malformed
    /// reference both fail here.
    pub async fn resolve(&self, task: &Task, reference: Option<&str>) -> Result<Option<Value>> {
        let reference = reference
            .ok_or_else(|| CheckError::Resolution("Task focus is missing or null".to_string()))?;

        match FocusReference::parse(reference)? {
            FocusReference::Contained(id) => Ok(task
                .contained
                .iter()
                .find(|resource| resource.get("id").and_then(Value::as_str) == Some(id))
                .cloned()),
            FocusReference::Remote { resource_type, id } => {
                let resource = self.backend.read(resource_type, id).await?;
                Ok(Some(resource))
            }
        }
    }
}
