//! Health check endpoint

use axum::response::Json;
use serde_json::{json, Value};

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "health": "Ok!" }))
}
