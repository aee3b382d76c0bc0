//! Manual scale endpoint handler.

use crate::api::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Confirmation returned by a successful manual scale.
#[derive(Debug, Serialize)]
pub struct ScaleResponse {
    pub message: String,
    pub service: String,
    pub replicas: i32,
}

/// POST /scale/{service}/{replicas} - Manually scale a managed deployment.
///
/// Negative counts are rejected here before the manager is consulted, so a
/// bad request never reaches the orchestrator. Scaling above zero resets the
/// inactivity timer.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Path((service, replicas)): Path<(String, i32)>,
) -> Result<Json<ScaleResponse>, ApiError> {
    if replicas < 0 {
        return Err(ApiError::invalid_replicas(replicas));
    }

    state.manager.scale_manual(&service, replicas).await?;

    info!(service = %service, replicas, "manual scale applied");
    Ok(Json(ScaleResponse {
        message: format!("Scaling deployment to {} replicas", replicas),
        service,
        replicas,
    }))
}
