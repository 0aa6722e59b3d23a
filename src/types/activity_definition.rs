use serde::{Deserialize, Serialize};

use super::CodeableConcept;

/// Server-side definition identifying which named check applies to a Task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDefinition {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
}

impl ActivityDefinition {
    pub const RESOURCE_TYPE: &'static str = "ActivityDefinition";

    /// The check name: the first coding entry's `code` under `code.coding`.
    pub fn check_name(&self) -> Option<&str> {
        self.code.as_ref()?.coding.first()?.code.as_deref()
    }
}
