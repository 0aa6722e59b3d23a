use serde::{Deserialize, Serialize};

use super::Coding;

/// The sole externally observable result document, for both the success and
/// the validation-failure path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,

    pub issue: Vec<OutcomeIssue>,
}

/// One issue record inside an [`OperationOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeIssue {
    pub severity: IssueSeverity,

    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<IssueDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// Structured issue classification: codings plus human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IssueDetails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl OperationOutcome {
    pub const RESOURCE_TYPE: &'static str = "OperationOutcome";

    /// Outcome wrapping the given issue sequence (possibly empty).
    pub fn new(issue: Vec<OutcomeIssue>) -> Self {
        Self {
            resource_type: Self::RESOURCE_TYPE.to_string(),
            issue,
        }
    }

    /// Outcome carrying a single error issue with the given code and text.
    pub fn error(code: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::new(vec![
            OutcomeIssue::new(IssueSeverity::Error, code).with_diagnostics(diagnostics),
        ])
    }
}

impl OutcomeIssue {
    pub fn new(severity: IssueSeverity, code: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            details: None,
            diagnostics: None,
            expression: None,
        }
    }

    pub fn with_details(mut self, details: IssueDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Into<String>) -> Self {
        self.diagnostics = Some(diagnostics.into());
        self
    }

    pub fn with_expression(mut self, expression: Vec<String>) -> Self {
        self.expression = Some(expression);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_outcome_serialization() {
        let outcome = OperationOutcome::new(Vec::new());
        let serialized = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            serialized,
            json!({ "resourceType": "OperationOutcome", "issue": [] })
        );
    }

    #[test]
    fn test_outcome_round_trip_preserves_issue_order() {
        let outcome = OperationOutcome::new(vec![
            OutcomeIssue::new(IssueSeverity::Error, "invalid-format")
                .with_details(IssueDetails {
                    coding: vec![Coding::new("http://example.org/detail", "FIRST")],
                    text: Some("first issue".to_string()),
                })
                .with_diagnostics("Identifier abc is an invalid format")
                .with_expression(vec!["ValueSet.expansion.contains".to_string()]),
            OutcomeIssue::new(IssueSeverity::Warning, "informational")
                .with_diagnostics("second issue"),
        ]);

        let serialized = serde_json::to_string(&outcome).unwrap();
        let deserialized: OperationOutcome = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, outcome);
        assert_eq!(deserialized.issue[0].code, "invalid-format");
        assert_eq!(deserialized.issue[1].code, "informational");
    }

    #[test]
    fn test_single_error_constructor() {
        let outcome = OperationOutcome::error("invalid", "Task focus is missing or null");
        assert_eq!(outcome.issue.len(), 1);
        assert_eq!(outcome.issue[0].severity, IssueSeverity::Error);
        assert_eq!(
            outcome.issue[0].diagnostics.as_deref(),
            Some("Task focus is missing or null")
        );
    }
}
