//! HTTP route handlers

pub mod check;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Assemble the service router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/check", post(check::process_task))
        .with_state(state)
}
