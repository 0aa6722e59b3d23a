use serde::Deserialize;
use serde_json::Value;

/// Inbound workflow request naming a focus data set and a canonical check.
///
/// `contained` stays untyped: contained resources are heterogeneous and are
/// only inspected through their `id` and `resourceType` until resolved.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub resource_type: String,

    #[serde(default)]
    pub contained: Vec<Value>,

    #[serde(default)]
    pub focus: Option<TaskFocus>,

    #[serde(default)]
    pub instantiates_canonical: Option<String>,
}

/// The Task focus element, carrying the reference string to resolve.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskFocus {
    #[serde(default)]
    pub reference: Option<String>,
}

impl Task {
    pub const RESOURCE_TYPE: &'static str = "Task";

    /// The focus reference string, if present.
    pub fn focus_reference(&self) -> Option<&str> {
        self.focus.as_ref()?.reference.as_deref()
    }
}
