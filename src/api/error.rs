//! API error envelope.
//!
//! Every failure surfaced by a handler maps to one entry of the error
//! taxonomy: caller mistakes (unknown service, negative replicas),
//! orchestrator rejections, the distinct activation failure modes, and
//! upstream forwarding failures. The `code` field is the stable
//! machine-readable discriminator.

use crate::manager::ManagerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error returned by API handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// JSON envelope wrapping the error body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, r#type: &str, code: &str, message: String) -> Self {
        Self {
            status,
            error: ApiErrorBody {
                message,
                r#type: r#type.to_string(),
                code: Some(code.to_string()),
            },
        }
    }

    /// Unknown service name (404). A caller error, not retried.
    pub fn unknown_service(service: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "invalid_request_error",
            "unknown_service",
            format!("Service '{}' is not configured", service),
        )
    }

    /// Negative replica count on manual scale (400).
    pub fn invalid_replicas(replicas: i32) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            "invalid_replicas",
            format!("Replica count must be non-negative, got {}", replicas),
        )
    }

    /// Orchestrator rejected a scale command (500).
    pub fn scale_rejected(service: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "orchestrator_error",
            "scale_rejected",
            format!("Failed to scale deployment for service '{}'", service),
        )
    }

    /// Deployment backing the service does not exist (503).
    pub fn deployment_missing(deployment: &str) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "service_unavailable",
            "deployment_missing",
            format!("Deployment '{}' not found", deployment),
        )
    }

    /// Pod entered Failed phase during activation (503).
    pub fn pod_failed(service: &str) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "service_unavailable",
            "pod_failed",
            format!("Pod for service '{}' failed during activation", service),
        )
    }

    /// Activation did not complete within the configured window (503).
    pub fn activation_timeout(service: &str, timeout_seconds: u64) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "service_unavailable",
            "activation_timeout",
            format!(
                "Service '{}' activation failed after {}s",
                service, timeout_seconds
            ),
        )
    }

    /// Backend reachable per orchestrator but the forward itself failed (502).
    pub fn upstream_failed(service: &str, detail: &str) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            "upstream_error",
            "upstream_failed",
            format!("Forwarding to service '{}' failed: {}", service, detail),
        )
    }

    /// Malformed inbound request (400).
    pub fn bad_request(message: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            "invalid_request_error",
            message.to_string(),
        )
    }
}

impl From<ManagerError> for ApiError {
    fn from(e: ManagerError) -> Self {
        match e {
            ManagerError::UnknownService(service) => Self::unknown_service(&service),
            ManagerError::InvalidReplicas(replicas) => Self::invalid_replicas(replicas),
            ManagerError::DeploymentMissing(deployment) => Self::deployment_missing(&deployment),
            ManagerError::ScaleRejected(service) => Self::scale_rejected(&service),
            ManagerError::PodFailed(service) => Self::pod_failed(&service),
            ManagerError::ActivationTimeout {
                service,
                timeout_seconds,
            } => Self::activation_timeout(&service, timeout_seconds),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorEnvelope { error: self.error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_maps_to_404() {
        let error = ApiError::unknown_service("ghost");
        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.error.code.as_deref(), Some("unknown_service"));
    }

    #[test]
    fn test_invalid_replicas_maps_to_400() {
        let error = ApiError::invalid_replicas(-1);
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert!(error.error.message.contains("-1"));
    }

    #[test]
    fn test_activation_failures_are_distinct() {
        let timeout = ApiError::from(ManagerError::ActivationTimeout {
            service: "vllm".to_string(),
            timeout_seconds: 120,
        });
        let failed = ApiError::from(ManagerError::PodFailed("vllm".to_string()));
        let missing = ApiError::from(ManagerError::DeploymentMissing("vllm".to_string()));

        assert_eq!(timeout.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(failed.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(missing.status, StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(timeout.error.code.as_deref(), Some("activation_timeout"));
        assert_eq!(failed.error.code.as_deref(), Some("pod_failed"));
        assert_eq!(missing.error.code.as_deref(), Some("deployment_missing"));
    }

    #[test]
    fn test_scale_rejected_maps_to_500() {
        let error = ApiError::from(ManagerError::ScaleRejected("vllm".to_string()));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_failed_maps_to_502() {
        let error = ApiError::upstream_failed("vllm", "connection refused");
        assert_eq!(error.status, StatusCode::BAD_GATEWAY);
        assert_eq!(error.error.code.as_deref(), Some("upstream_failed"));
    }

    #[test]
    fn test_envelope_serialization() {
        let error = ApiError::activation_timeout("vllm", 120);
        let json = serde_json::to_string(&ApiErrorEnvelope { error: error.error }).unwrap();
        assert!(json.contains("\"error\""));
        assert!(json.contains("activation_timeout"));
        assert!(json.contains("120s"));
    }
}
