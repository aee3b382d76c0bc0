//! kubectl-backed orchestrator client.
//!
//! Shells out to `kubectl` with explicit arguments (no shell interpolation)
//! and maps process failures to the sentinel returns of the
//! [`Orchestrator`](super::Orchestrator) contract.

use super::{Orchestrator, PodPhase, REPLICAS_UNKNOWN};
use crate::config::ServiceConfig;
use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

/// Orchestrator implementation that drives `kubectl`.
#[derive(Debug, Clone, Default)]
pub struct KubectlClient;

impl KubectlClient {
    pub fn new() -> Self {
        Self
    }

    /// Run a kubectl subcommand in the given namespace and return stdout.
    async fn exec(&self, namespace: &str, args: &[&str]) -> anyhow::Result<String> {
        debug!(namespace, ?args, "executing kubectl");

        let output = Command::new("kubectl")
            .arg("-n")
            .arg(namespace)
            .args(args)
            .output()
            .await
            .context("failed to spawn kubectl")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("kubectl exited with {}: {}", output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Orchestrator for KubectlClient {
    async fn deployment_exists(&self, service: &ServiceConfig) -> bool {
        let args = ["get", "deployment", &service.deployment, "--no-headers"];
        match self.exec(&service.namespace, &args).await {
            Ok(_) => true,
            Err(e) => {
                debug!(deployment = %service.deployment, error = %e, "deployment lookup failed");
                false
            }
        }
    }

    async fn pod_phase(&self, service: &ServiceConfig) -> PodPhase {
        let selector = format!("{}={}", service.selector_label, service.selector_value);
        let args = [
            "get",
            "pods",
            "-l",
            &selector,
            "-o",
            "jsonpath={.items[*].status.phase}",
        ];

        match self.exec(&service.namespace, &args).await {
            Ok(output) if !output.is_empty() => PodPhase::first_active(&output),
            Ok(_) => {
                debug!(service = %service.name, "no pods found");
                PodPhase::Unknown
            }
            Err(e) => {
                error!(service = %service.name, error = %e, "pod phase query failed");
                PodPhase::Unknown
            }
        }
    }

    async fn scale_deployment(&self, service: &ServiceConfig, replicas: i32) -> bool {
        if replicas < 0 {
            error!(service = %service.name, replicas, "invalid replica count");
            return false;
        }

        let replicas_arg = format!("--replicas={}", replicas);
        let args = ["scale", "deployment", &service.deployment, &replicas_arg];

        match self.exec(&service.namespace, &args).await {
            Ok(_) => {
                debug!(
                    deployment = %service.deployment,
                    replicas,
                    "scaled deployment"
                );
                true
            }
            Err(e) => {
                error!(deployment = %service.deployment, error = %e, "scale command failed");
                false
            }
        }
    }

    async fn replicas(&self, service: &ServiceConfig) -> i32 {
        let args = [
            "get",
            "deployment",
            &service.deployment,
            "-o",
            "jsonpath={.spec.replicas}",
        ];

        match self.exec(&service.namespace, &args).await {
            Ok(output) if !output.is_empty() => output.parse().unwrap_or_else(|_| {
                error!(
                    deployment = %service.deployment,
                    output,
                    "failed to parse replica count"
                );
                REPLICAS_UNKNOWN
            }),
            Ok(_) => REPLICAS_UNKNOWN,
            Err(e) => {
                error!(deployment = %service.deployment, error = %e, "replica query failed");
                REPLICAS_UNKNOWN
            }
        }
    }
}
