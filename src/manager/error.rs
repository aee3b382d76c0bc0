//! Error types for service lifecycle operations.

use thiserror::Error;

/// Errors reported by [`ServiceManager`](super::ServiceManager) operations.
///
/// Each variant is a distinct, caller-visible condition: configuration
/// mistakes, orchestrator rejections, and the two ways an activation can die
/// (pod failure vs. timeout) are never collapsed into one another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("replica count must be non-negative, got {0}")]
    InvalidReplicas(i32),

    #[error("deployment '{0}' not found")]
    DeploymentMissing(String),

    #[error("orchestrator rejected scale command for service '{0}'")]
    ScaleRejected(String),

    #[error("pod for service '{0}' entered Failed phase during activation")]
    PodFailed(String),

    #[error("service '{service}' not ready after {timeout_seconds}s")]
    ActivationTimeout {
        service: String,
        timeout_seconds: u64,
    },
}
