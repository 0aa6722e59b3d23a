//! SNOMED CT concept-code format check

use crate::checks::Check;
use crate::types::{Coding, IssueDetails, IssueSeverity, OutcomeIssue, ValueSet};

/// Coding system whose concept codes must be numeric identifiers.
pub const SNOMED_CT_SYSTEM: &str = "http://snomed.info/sct";

/// Detail coding system for issues raised by this service.
pub const ISSUE_DETAIL_SYSTEM: &str = "http://vsmt.dedalus.eu/issue-detail";

const INVALID_FORMAT_CODE: &str = "INVALID_CONCEPT_IDENTIFIER_FORMAT";

/// Flags SNOMED CT concepts whose code does not parse as a number.
///
/// Concepts under other coding systems are not inspected, and a ValueSet
/// without an expansion yields zero issues.
pub struct CodeFormatCheck;

impl Check for CodeFormatCheck {
    fn name(&self) -> &'static str {
        "code-format"
    }

    fn run(&self, value_set: &ValueSet) -> Vec<OutcomeIssue> {
        let mut issues = Vec::new();

        let concepts = value_set
            .expansion
            .as_ref()
            .and_then(|expansion| expansion.contains.as_ref());
        let Some(concepts) = concepts else {
            return issues;
        };

        for concept in concepts {
            let (Some(system), Some(code)) = (concept.system.as_deref(), concept.code.as_deref())
            else {
                continue;
            };
            if system != SNOMED_CT_SYSTEM || code.parse::<f64>().is_ok() {
                continue;
            }
            issues.push(invalid_format_issue(system, code));
        }

        issues
    }
}

fn invalid_format_issue(system: &str, code: &str) -> OutcomeIssue {
    OutcomeIssue::new(IssueSeverity::Error, "invalid-format")
        .with_details(IssueDetails {
            coding: vec![Coding::new(ISSUE_DETAIL_SYSTEM, INVALID_FORMAT_CODE)
                .with_display("Concept is not in the correct format for the CodeSystem")],
            text: Some("The provided identifier is not a valid SNOMED CT Concept ID.".to_string()),
        })
        .with_diagnostics(format!("Identifier {code} is an invalid format"))
        .with_expression(vec![format!(
            "ValueSet.expansion.contains.where(system = '{system}' ).concept.where(code = '{code}')"
        )])
}
