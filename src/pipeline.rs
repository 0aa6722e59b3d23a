//! Validation pipeline orchestrating one Task request

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::checks::CheckRegistry;
use crate::client::FhirBackend;
use crate::error::{CheckError, Result};
use crate::resolve::{CanonicalResolver, ReferenceResolver};
use crate::types::{ActivityDefinition, OperationOutcome, OutcomeIssue, Task, ValueSet};

/// Terminal result of evaluating one Task request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The Task was processable; the outcome carries the check's issues
    /// (HTTP 200, issue list possibly empty).
    Accepted(OperationOutcome),

    /// The Task failed validation; the outcome explains why (HTTP 400).
    Rejected(OperationOutcome),
}

/// Stateless per-request orchestrator: shape check, focus resolution,
/// canonical resolution, check dispatch, outcome assembly.
pub struct ValidationPipeline {
    references: ReferenceResolver,
    canonicals: CanonicalResolver,
    registry: CheckRegistry,
}

impl ValidationPipeline {
    pub fn new(
        data_backend: Arc<dyn FhirBackend>,
        terminology_backend: Arc<dyn FhirBackend>,
        registry: CheckRegistry,
    ) -> Self {
        Self {
            references: ReferenceResolver::new(data_backend),
            canonicals: CanonicalResolver::new(terminology_backend),
            registry,
        }
    }

    /// Evaluate one Task document end to end.
    ///
    /// Validation failures come back as [`TaskOutcome::Rejected`] carrying an
    /// OperationOutcome; only upstream faults and unsupported check names
    /// surface as errors.
    pub async fn evaluate(&self, payload: &Value) -> Result<TaskOutcome> {
        match self.run(payload).await {
            Ok(outcome) => Ok(TaskOutcome::Accepted(outcome)),
            Err(err) if err.rejects_task() => {
                warn!(error = %err, "Task rejected");
                Ok(TaskOutcome::Rejected(OperationOutcome::error(
                    "invalid",
                    err.to_string(),
                )))
            }
            Err(err) => Err(err),
        }
    }

    async fn run(&self, payload: &Value) -> Result<OperationOutcome> {
        let task = self.check_shape(payload)?;
        // Focus resolution runs before canonical resolution: when a request
        // is broken on both counts the caller sees the focus failure.
        let value_set = self.resolve_focus(&task).await?;
        let definition = self.resolve_canonical(&task).await?;
        let issues = self.dispatch(&definition, &value_set)?;
        Ok(OperationOutcome::new(issues))
    }

    fn check_shape(&self, payload: &Value) -> Result<Task> {
        let resource_type = payload
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if resource_type != Task::RESOURCE_TYPE {
            return Err(CheckError::Shape(format!(
                "Failed to parse Task resource: expected 'Task' resourceType but got '{resource_type}'"
            )));
        }

        serde_json::from_value(payload.clone())
            .map_err(|e| CheckError::Shape(format!("Failed to parse Task resource: {e}")))
    }

    async fn resolve_focus(&self, task: &Task) -> Result<ValueSet> {
        let reference = task.focus_reference();
        info!(
            reference = reference.unwrap_or("<none>"),
            "resolving Task focus"
        );

        let resource = self.references.resolve(task, reference).await?;
        let resource = resource.ok_or_else(|| {
            CheckError::Resolution(format!(
                "Task focus reference '{}' did not match any contained resource",
                reference.unwrap_or_default()
            ))
        })?;

        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if resource_type != ValueSet::RESOURCE_TYPE {
            return Err(CheckError::Resolution(format!(
                "Task focus is not a ValueSet, but it should be. Got '{resource_type}'"
            )));
        }

        let value_set: ValueSet = serde_json::from_value(resource)
            .map_err(|e| CheckError::Resolution(format!("Task focus ValueSet is malformed: {e}")))?;
        info!(
            url = value_set.url.as_deref().unwrap_or("<none>"),
            "Task focus resolved to ValueSet"
        );
        Ok(value_set)
    }

    async fn resolve_canonical(&self, task: &Task) -> Result<ActivityDefinition> {
        let canonical = task.instantiates_canonical.as_deref().ok_or_else(|| {
            CheckError::Shape("Task instantiatesCanonical is missing or null".to_string())
        })?;
        self.canonicals.resolve(canonical).await
    }

    fn dispatch(
        &self,
        definition: &ActivityDefinition,
        value_set: &ValueSet,
    ) -> Result<Vec<OutcomeIssue>> {
        let check_name = definition
            .check_name()
            .ok_or_else(|| CheckError::UnsupportedCheck("(none)".to_string()))?;
        info!(check = check_name, "processing check");
        self.registry.execute(check_name, value_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bundle;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        read_result: Option<Value>,
        search_bundle: Value,
        reads: AtomicUsize,
        searches: AtomicUsize,
    }

    impl FakeBackend {
        fn new(read_result: Option<Value>, search_bundle: Value) -> Arc<Self> {
            Arc::new(Self {
                read_result,
                search_bundle,
                reads: AtomicUsize::new(0),
                searches: AtomicUsize::new(0),
            })
        }

        fn unused() -> Arc<Self> {
            Self::new(None, json!({ "resourceType": "Bundle", "total": 0 }))
        }
    }

    #[async_trait]
    impl FhirBackend for FakeBackend {
        async fn read(&self, _resource_type: &str, _id: &str) -> Result<Value> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.read_result
                .clone()
                .ok_or_else(|| CheckError::Transport("no read fixture".to_string()))
        }

        async fn search_activity_definitions(&self, _canonical_url: &str) -> Result<Bundle> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.search_bundle.clone())?)
        }
    }

    fn code_format_bundle() -> Value {
        json!({
            "resourceType": "Bundle",
            "total": 1,
            "entry": [ { "resource": {
                "resourceType": "ActivityDefinition",
                "url": "http://example.org/ad/code-format",
                "code": { "coding": [ { "code": "code-format" } ] }
            } } ]
        })
    }

    fn task_payload(concepts: Value) -> Value {
        json!({
            "resourceType": "Task",
            "focus": { "reference": "#vs-1" },
            "instantiatesCanonical": "http://example.org/ad/code-format",
            "contained": [ {
                "resourceType": "ValueSet",
                "id": "vs-1",
                "url": "http://example.org/vs/vs-1",
                "expansion": { "contains": concepts }
            } ]
        })
    }

    fn pipeline(data: Arc<FakeBackend>, terminology: Arc<FakeBackend>) -> ValidationPipeline {
        ValidationPipeline::new(data, terminology, CheckRegistry::with_builtin_checks())
    }

    fn rejection_diagnostics(outcome: &TaskOutcome) -> &str {
        match outcome {
            TaskOutcome::Rejected(outcome) => {
                outcome.issue[0].diagnostics.as_deref().unwrap_or_default()
            }
            TaskOutcome::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[tokio::test]
    async fn test_non_task_payload_names_received_type() {
        let pipeline = pipeline(FakeBackend::unused(), FakeBackend::unused());

        let outcome = pipeline
            .evaluate(&json!({ "resourceType": "Patient" }))
            .await
            .unwrap();

        assert_eq!(
            rejection_diagnostics(&outcome),
            "Failed to parse Task resource: expected 'Task' resourceType but got 'Patient'"
        );
    }

    #[tokio::test]
    async fn test_missing_focus_is_rejected() {
        let pipeline = pipeline(FakeBackend::unused(), FakeBackend::unused());

        let outcome = pipeline
            .evaluate(&json!({ "resourceType": "Task" }))
            .await
            .unwrap();

        assert_eq!(rejection_diagnostics(&outcome), "Task focus is missing or null");
    }

    #[tokio::test]
    async fn test_clean_valueset_yields_empty_issue_list() {
        let terminology = FakeBackend::new(None, code_format_bundle());
        let pipeline = pipeline(FakeBackend::unused(), terminology);

        let payload = task_payload(json!([
            { "system": "http://snomed.info/sct", "code": "123037004" }
        ]));

        match pipeline.evaluate(&payload).await.unwrap() {
            TaskOutcome::Accepted(outcome) => assert!(outcome.issue.is_empty()),
            TaskOutcome::Rejected(outcome) => panic!("unexpected rejection: {outcome:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_concept_yields_one_issue() {
        let terminology = FakeBackend::new(None, code_format_bundle());
        let pipeline = pipeline(FakeBackend::unused(), terminology);

        let payload = task_payload(json!([
            { "system": "http://snomed.info/sct", "code": "123" },
            { "system": "http://snomed.info/sct", "code": "abc" },
            { "system": "other", "code": "xyz" }
        ]));

        match pipeline.evaluate(&payload).await.unwrap() {
            TaskOutcome::Accepted(outcome) => {
                assert_eq!(outcome.issue.len(), 1);
                assert_eq!(
                    outcome.issue[0].diagnostics.as_deref(),
                    Some("Identifier abc is an invalid format")
                );
            }
            TaskOutcome::Rejected(outcome) => panic!("unexpected rejection: {outcome:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_focus_type_fails_before_canonical_resolution() {
        let terminology = FakeBackend::new(None, code_format_bundle());
        let pipeline = pipeline(FakeBackend::unused(), terminology.clone());

        let payload = json!({
            "resourceType": "Task",
            "focus": { "reference": "#p-1" },
            "instantiatesCanonical": "http://example.org/ad/code-format",
            "contained": [ { "resourceType": "Patient", "id": "p-1" } ]
        });

        let outcome = pipeline.evaluate(&payload).await.unwrap();
        assert_eq!(
            rejection_diagnostics(&outcome),
            "Task focus is not a ValueSet, but it should be. Got 'Patient'"
        );
        assert_eq!(terminology.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmatched_contained_anchor_is_distinct_rejection() {
        let pipeline = pipeline(FakeBackend::unused(), FakeBackend::unused());

        let payload = json!({
            "resourceType": "Task",
            "focus": { "reference": "#missing" },
            "contained": [ { "resourceType": "ValueSet", "id": "vs-1" } ]
        });

        let outcome = pipeline.evaluate(&payload).await.unwrap();
        assert_eq!(
            rejection_diagnostics(&outcome),
            "Task focus reference '#missing' did not match any contained resource"
        );
    }

    #[tokio::test]
    async fn test_canonical_not_found_is_forwarded() {
        let terminology = FakeBackend::new(None, json!({ "resourceType": "Bundle", "total": 0 }));
        let pipeline = pipeline(FakeBackend::unused(), terminology);

        let outcome = pipeline.evaluate(&task_payload(json!([]))).await.unwrap();
        assert_eq!(
            rejection_diagnostics(&outcome),
            "ActivityDefinition not found for canonical URL 'http://example.org/ad/code-format'"
        );
    }

    #[tokio::test]
    async fn test_missing_canonical_is_rejected() {
        let pipeline = pipeline(FakeBackend::unused(), FakeBackend::unused());

        let payload = json!({
            "resourceType": "Task",
            "focus": { "reference": "#vs-1" },
            "contained": [ { "resourceType": "ValueSet", "id": "vs-1" } ]
        });

        let outcome = pipeline.evaluate(&payload).await.unwrap();
        assert_eq!(
            rejection_diagnostics(&outcome),
            "Task instantiatesCanonical is missing or null"
        );
    }

    #[tokio::test]
    async fn test_unsupported_check_is_an_error_not_an_outcome() {
        let terminology = FakeBackend::new(
            None,
            json!({
                "resourceType": "Bundle",
                "total": 1,
                "entry": [ { "resource": {
                    "resourceType": "ActivityDefinition",
                    "code": { "coding": [ { "code": "no-such-check" } ] }
                } } ]
            }),
        );
        let pipeline = pipeline(FakeBackend::unused(), terminology);

        let err = pipeline
            .evaluate(&task_payload(json!([])))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedCheck(_)));
    }

    #[tokio::test]
    async fn test_transport_fault_propagates() {
        let data = FakeBackend::new(None, json!({ "resourceType": "Bundle", "total": 0 }));
        let pipeline = pipeline(data, FakeBackend::unused());

        let payload = json!({
            "resourceType": "Task",
            "focus": { "reference": "ValueSet/remote-vs" },
            "instantiatesCanonical": "http://example.org/ad/code-format"
        });

        let err = pipeline.evaluate(&payload).await.unwrap_err();
        assert!(matches!(err, CheckError::Transport(_)));
    }
}
