//! FHIR resource types exchanged by the check service

pub mod activity_definition;
pub mod bundle;
pub mod coding;
pub mod outcome;
pub mod task;
pub mod valueset;

pub use activity_definition::ActivityDefinition;
pub use bundle::{Bundle, BundleEntry};
pub use coding::{CodeableConcept, Coding};
pub use outcome::{IssueDetails, IssueSeverity, OperationOutcome, OutcomeIssue};
pub use task::{Task, TaskFocus};
pub use valueset::{ExpansionContains, ValueSet, ValueSetExpansion};
