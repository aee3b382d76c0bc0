//! Service status endpoint handler.

use crate::api::{ApiError, AppState};
use crate::manager::ServiceStatus;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

/// GET /status/{service} - Pod phase, replica count, and activity for a
/// managed service.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
) -> Result<Json<ServiceStatus>, ApiError> {
    let status = state.manager.status(&service).await?;
    Ok(Json(status))
}
