//! Controller liveness endpoint handler.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub services: usize,
}

/// GET /healthz - Controller liveness plus managed-service count.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        services: state.config.services.len(),
    })
}
