//! Service lifecycle management.
//!
//! This module owns the scale-to-zero state machine: a registry of
//! per-service state, the activation coordinator that brings parked
//! deployments up on demand, and the per-service inactivity monitors that
//! scale them back down.
//!
//! # Concurrency model
//!
//! Each service has one entry in a concurrent map, holding an activation
//! lock, the last-activity stamp, and at most one running monitor task.
//! Activation attempts for one service are totally ordered by its lock;
//! services never share state, so activation for one service cannot block
//! another. All monitors run under a child of the manager's cancellation
//! token and are awaited on shutdown.
//!
//! # Example
//!
//! ```no_run
//! use parka::config::ParkaConfig;
//! use parka::manager::ServiceManager;
//! use parka::orchestrator::KubectlClient;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = Arc::new(ParkaConfig::default());
//! let manager = ServiceManager::new(config, Arc::new(KubectlClient::new()));
//!
//! if manager.ensure_running("vllm").await.is_ok() {
//!     manager.reset_activity("vllm");
//! }
//! # }
//! ```

mod error;
mod state;

pub use error::ManagerError;
pub use state::{Activity, ServiceEntry};

use crate::config::{ParkaConfig, ServiceConfig};
use crate::orchestrator::{Orchestrator, PodPhase, REPLICAS_UNKNOWN};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Interval between pod phase checks while waiting for activation.
pub const ACTIVATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Interval between inactivity monitor checks. Coarser than the activation
/// poll since downscale latency is not user-visible.
pub const MONITOR_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Point-in-time view of a managed service, as returned by the status query.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub service: String,
    pub phase: PodPhase,
    pub running: bool,
    pub replicas: i32,
    pub last_activity: DateTime<Utc>,
    pub monitor_active: bool,
}

/// Coordinates activation, activity tracking, and scale-to-zero for all
/// managed services.
///
/// Constructed once at startup and shared with request handlers via `Arc`.
/// Per-service state is created lazily on first reference; the concurrent
/// map makes first-access registration atomic, so two simultaneous first
/// requests for the same name share one entry.
pub struct ServiceManager {
    config: Arc<ParkaConfig>,
    orchestrator: Arc<dyn Orchestrator>,
    services: DashMap<String, Arc<ServiceEntry>>,
    shutdown: CancellationToken,
}

impl ServiceManager {
    pub fn new(config: Arc<ParkaConfig>, orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
            services: DashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    fn entry(&self, name: &str) -> Arc<ServiceEntry> {
        self.services
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(ServiceEntry::new()))
            .clone()
    }

    fn service_config(&self, name: &str) -> Result<&ServiceConfig, ManagerError> {
        self.config
            .service(name)
            .ok_or_else(|| ManagerError::UnknownService(name.to_string()))
    }

    /// Ensure the service's deployment has a running pod, scaling up if
    /// necessary.
    ///
    /// The per-service activation lock is held for the entire sequence, so a
    /// concurrent caller blocks until this attempt fully resolves and then
    /// re-evaluates from the phase check. A service that is already Running
    /// returns immediately without issuing any scale command.
    pub async fn ensure_running(&self, name: &str) -> Result<(), ManagerError> {
        let service = self.service_config(name)?;
        let entry = self.entry(name);
        let _guard = entry.activation.lock().await;

        if !self.orchestrator.deployment_exists(service).await {
            info!(deployment = %service.deployment, "deployment not found");
            return Err(ManagerError::DeploymentMissing(service.deployment.clone()));
        }

        let phase = self.orchestrator.pod_phase(service).await;
        if phase == PodPhase::Running {
            return Ok(());
        }

        info!(service = %service.name, %phase, "service not running, scaling up");
        if !self.orchestrator.scale_deployment(service, 1).await {
            return Err(ManagerError::ScaleRejected(service.name.clone()));
        }

        self.wait_until_ready(service).await
    }

    /// Poll the pod phase until Running, Failed, or the activation timeout.
    async fn wait_until_ready(&self, service: &ServiceConfig) -> Result<(), ManagerError> {
        let timeout = Duration::from_secs(service.activation_timeout_seconds);
        let deadline = Instant::now() + timeout;

        while Instant::now() < deadline {
            let phase = self.orchestrator.pod_phase(service).await;
            if phase == PodPhase::Running {
                return Ok(());
            }
            if phase == PodPhase::Failed {
                error!(service = %service.name, "pod failed during activation");
                return Err(ManagerError::PodFailed(service.name.clone()));
            }
            tokio::time::sleep(ACTIVATION_POLL_INTERVAL).await;
        }

        error!(
            service = %service.name,
            timeout_seconds = service.activation_timeout_seconds,
            "timeout waiting for pod to become ready"
        );
        Err(ManagerError::ActivationTimeout {
            service: service.name.clone(),
            timeout_seconds: service.activation_timeout_seconds,
        })
    }

    /// Record activity for a service and make sure its inactivity monitor is
    /// running.
    ///
    /// Called after every successful activation, every successful proxied
    /// request, and every manual scale-up. The spawn-if-absent check is
    /// linearized with the monitor's own exit path, so at most one monitor
    /// runs per service.
    pub fn reset_activity(&self, name: &str) {
        let Some(service) = self.config.service(name) else {
            warn!(service = name, "activity reset for unknown service ignored");
            return;
        };

        let entry = self.entry(name);
        entry.touch();

        let spawned = entry.spawn_monitor_if_absent(|| {
            let orchestrator = Arc::clone(&self.orchestrator);
            let service = service.clone();
            let entry = Arc::clone(&entry);
            let cancel = self.shutdown.child_token();
            tokio::spawn(Self::monitor(orchestrator, service, entry, cancel))
        });

        if spawned {
            debug!(service = name, "spawned inactivity monitor");
        }
    }

    /// Inactivity monitor task body: one per service at a time.
    ///
    /// Exits when the deployment disappears or after issuing a scale-to-zero;
    /// transient query failures keep the monitor alive rather than abandoning
    /// a service that may still need downscaling. On every exit path the task
    /// clears its own handle so a future activity reset can respawn it.
    async fn monitor(
        orchestrator: Arc<dyn Orchestrator>,
        service: ServiceConfig,
        entry: Arc<ServiceEntry>,
        cancel: CancellationToken,
    ) {
        let inactivity_timeout = Duration::from_secs(service.inactivity_timeout_seconds);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(service = %service.name, "inactivity monitor cancelled");
                    break;
                }
                _ = tokio::time::sleep(MONITOR_POLL_INTERVAL) => {}
            }

            if !orchestrator.deployment_exists(&service).await {
                debug!(service = %service.name, "deployment gone, monitor exiting");
                break;
            }

            let replicas = orchestrator.replicas(&service).await;
            if replicas == REPLICAS_UNKNOWN {
                warn!(service = %service.name, "replica count undeterminable, keeping monitor alive");
                continue;
            }

            let idle = entry.idle_for();
            if idle > inactivity_timeout && replicas > 0 {
                info!(
                    service = %service.name,
                    idle_seconds = idle.as_secs(),
                    timeout_seconds = service.inactivity_timeout_seconds,
                    "inactivity timeout exceeded, scaling down"
                );
                if !orchestrator.scale_deployment(&service, 0).await {
                    error!(service = %service.name, "scale-to-zero command failed");
                }
                break;
            }
        }

        entry.clear_monitor();
    }

    /// Whether an inactivity monitor is currently recorded for the service.
    pub fn monitor_active(&self, name: &str) -> bool {
        self.services
            .get(name)
            .map(|entry| entry.monitor_active())
            .unwrap_or(false)
    }

    /// Current phase, replica count, and activity information for a service.
    pub async fn status(&self, name: &str) -> Result<ServiceStatus, ManagerError> {
        let service = self.service_config(name)?;

        let phase = self.orchestrator.pod_phase(service).await;
        let replicas = self.orchestrator.replicas(service).await;
        let entry = self.entry(name);

        Ok(ServiceStatus {
            service: service.name.clone(),
            phase,
            running: phase == PodPhase::Running,
            replicas,
            last_activity: entry.last_activity().at,
            monitor_active: entry.monitor_active(),
        })
    }

    /// Manually set the replica count for a service.
    ///
    /// Negative counts are rejected before any orchestrator interaction.
    /// Scaling above zero counts as activity, so the inactivity timer resets
    /// and a monitor is spawned if absent.
    pub async fn scale_manual(&self, name: &str, replicas: i32) -> Result<(), ManagerError> {
        let service = self.service_config(name)?;

        if replicas < 0 {
            return Err(ManagerError::InvalidReplicas(replicas));
        }

        if !self.orchestrator.scale_deployment(service, replicas).await {
            return Err(ManagerError::ScaleRejected(service.name.clone()));
        }

        info!(service = %service.name, replicas, "manually scaled");
        if replicas > 0 {
            self.reset_activity(name);
        }

        Ok(())
    }

    /// Cancel all outstanding inactivity monitors and wait for them to exit.
    ///
    /// Cancellation is cooperative: monitors observe it between poll
    /// iterations, never in the middle of a scale command.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let handles: Vec<_> = self
            .services
            .iter()
            .filter_map(|entry| entry.value().take_monitor())
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "inactivity monitor panicked during shutdown");
            }
        }
    }
}
