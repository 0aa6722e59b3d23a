//! Task check endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{pipeline::TaskOutcome, state::AppState};

/// Submit a Task for validation.
///
/// Success and validation failure both carry an OperationOutcome body;
/// unsupported checks and upstream faults render the generic error body.
pub async fn process_task(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Response {
    match state.pipeline.evaluate(&payload).await {
        Ok(TaskOutcome::Accepted(outcome)) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(TaskOutcome::Rejected(outcome)) => {
            (StatusCode::BAD_REQUEST, Json(outcome)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
