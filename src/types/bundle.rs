use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search-result envelope returned by a FHIR server.
///
/// Transient: consumed immediately by the canonical resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(default)]
    pub total: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl Bundle {
    /// Take the first entry's embedded resource, if any.
    pub fn into_first_resource(self) -> Option<Value> {
        self.entry.into_iter().next().and_then(|entry| entry.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundle_deserialization() {
        let bundle: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "total": 1,
            "entry": [ { "resource": { "resourceType": "ActivityDefinition" } } ]
        }))
        .unwrap();

        assert_eq!(bundle.total, 1);
        let resource = bundle.into_first_resource().unwrap();
        assert_eq!(resource["resourceType"], "ActivityDefinition");
    }

    #[test]
    fn test_empty_bundle() {
        let bundle: Bundle =
            serde_json::from_value(json!({ "resourceType": "Bundle", "total": 0 })).unwrap();
        assert_eq!(bundle.total, 0);
        assert!(bundle.into_first_resource().is_none());
    }
}
