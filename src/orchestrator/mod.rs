//! Orchestrator client capability.
//!
//! The controller consumes a narrow slice of the cluster control plane:
//! query pod phase, query/set replica counts, and check deployment
//! existence. All operations surface failure as a boolean or sentinel value
//! rather than an error, so callers treat "unknown" uniformly with "not
//! ready" instead of special-casing transport failures.

mod kubectl;

pub use kubectl::KubectlClient;

use crate::config::ServiceConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sentinel replica count meaning "could not be determined".
///
/// Distinct from 0, which means the deployment was explicitly scaled down.
pub const REPLICAS_UNKNOWN: i32 = -1;

/// Lifecycle phase of a pod as reported by the orchestrator.
///
/// Derived fresh from a live query on every check, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl FromStr for PodPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PodPhase::Pending),
            "Running" => Ok(PodPhase::Running),
            "Succeeded" => Ok(PodPhase::Succeeded),
            "Failed" => Ok(PodPhase::Failed),
            "Unknown" => Ok(PodPhase::Unknown),
            _ => Err(format!("unknown pod phase: {}", s)),
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PodPhase::Pending => "Pending",
            PodPhase::Running => "Running",
            PodPhase::Succeeded => "Succeeded",
            PodPhase::Failed => "Failed",
            PodPhase::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl PodPhase {
    /// Pick the representative phase from a whitespace-separated phase list.
    ///
    /// During a rollout multiple pods can report different phases at once;
    /// the first parseable non-Failed phase wins. Unparseable entries are
    /// skipped with a warning. Returns `Unknown` when nothing qualifies.
    pub fn first_active(reported: &str) -> PodPhase {
        for token in reported.split_whitespace() {
            match token.parse::<PodPhase>() {
                Ok(PodPhase::Failed) => continue,
                Ok(phase) => return phase,
                Err(_) => {
                    tracing::warn!(phase = token, "skipping unparseable pod phase");
                }
            }
        }
        PodPhase::Unknown
    }
}

/// Read/write operations against the cluster control plane for one service.
///
/// Implementations must never panic on transport errors; failures map to
/// `false`, `PodPhase::Unknown`, or [`REPLICAS_UNKNOWN`].
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// True only if the deployment backing the service exists.
    /// Any query failure is treated as "absent".
    async fn deployment_exists(&self, service: &ServiceConfig) -> bool;

    /// Current pod phase for the service's selector.
    /// `Unknown` when no pods exist or the output cannot be parsed.
    async fn pod_phase(&self, service: &ServiceConfig) -> PodPhase;

    /// Set the desired replica count. Negative counts are rejected locally
    /// without an orchestrator round-trip. True only on confirmed success.
    async fn scale_deployment(&self, service: &ServiceConfig, replicas: i32) -> bool;

    /// Desired replica count, or [`REPLICAS_UNKNOWN`] if undeterminable.
    async fn replicas(&self, service: &ServiceConfig) -> i32;
}
