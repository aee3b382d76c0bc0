//! Shared test utilities for Parka integration tests.
//!
//! Provides reusable helpers for building service configurations, managers,
//! routers, and a scriptable orchestrator double that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use parka::api::{create_router, AppState};
use parka::config::{ParkaConfig, ServiceConfig};
use parka::manager::ServiceManager;
use parka::orchestrator::{Orchestrator, PodPhase};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// Config Builders
// =============================================================================

/// Create a service config with sensible test defaults.
pub fn make_service(name: &str) -> ServiceConfig {
    ServiceConfig {
        name: name.to_string(),
        deployment: format!("{}-deployment", name),
        selector_label: "app".to_string(),
        selector_value: name.to_string(),
        host: "127.0.0.1".to_string(),
        port: 8000,
        namespace: "default".to_string(),
        inactivity_timeout_seconds: 900,
        activation_timeout_seconds: 120,
    }
}

/// Create a service config with explicit timeouts.
pub fn make_service_with_timeouts(
    name: &str,
    inactivity_timeout_seconds: u64,
    activation_timeout_seconds: u64,
) -> ServiceConfig {
    ServiceConfig {
        inactivity_timeout_seconds,
        activation_timeout_seconds,
        ..make_service(name)
    }
}

/// Create a config holding the given services.
pub fn make_config(services: Vec<ServiceConfig>) -> Arc<ParkaConfig> {
    Arc::new(ParkaConfig {
        services,
        ..Default::default()
    })
}

// =============================================================================
// Fake Orchestrator
// =============================================================================

/// Scriptable orchestrator double.
///
/// Phase can be set directly, scripted as a sequence of responses, or made to
/// follow scale commands (scale to 1 flips the phase to Running). Every scale
/// command is recorded for call-count assertions.
pub struct FakeOrchestrator {
    exists: AtomicBool,
    phase: Mutex<PodPhase>,
    phase_script: Mutex<VecDeque<PodPhase>>,
    replicas: AtomicI32,
    phase_follows_scale: AtomicBool,
    fail_scale: AtomicBool,
    scale_calls: Mutex<Vec<i32>>,
}

impl FakeOrchestrator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            exists: AtomicBool::new(true),
            phase: Mutex::new(PodPhase::Unknown),
            phase_script: Mutex::new(VecDeque::new()),
            replicas: AtomicI32::new(0),
            phase_follows_scale: AtomicBool::new(false),
            fail_scale: AtomicBool::new(false),
            scale_calls: Mutex::new(Vec::new()),
        })
    }

    /// Orchestrator double for an already-running service.
    pub fn running() -> Arc<Self> {
        let fake = Self::new();
        fake.set_phase(PodPhase::Running);
        fake.set_replicas(1);
        fake
    }

    pub fn set_exists(&self, exists: bool) {
        self.exists.store(exists, Ordering::SeqCst);
    }

    pub fn set_phase(&self, phase: PodPhase) {
        *self.phase.lock().unwrap() = phase;
    }

    /// Queue phases to be reported one per query before falling back to the
    /// current phase.
    pub fn script_phases(&self, phases: &[PodPhase]) {
        self.phase_script.lock().unwrap().extend(phases.iter().copied());
    }

    pub fn set_replicas(&self, replicas: i32) {
        self.replicas.store(replicas, Ordering::SeqCst);
    }

    /// Make scale commands drive the reported phase: 1 -> Running, 0 -> Unknown.
    pub fn follow_scale(&self) {
        self.phase_follows_scale.store(true, Ordering::SeqCst);
    }

    pub fn reject_scale(&self) {
        self.fail_scale.store(true, Ordering::SeqCst);
    }

    /// Every replica count passed to a scale command, in order.
    pub fn scale_calls(&self) -> Vec<i32> {
        self.scale_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Orchestrator for FakeOrchestrator {
    async fn deployment_exists(&self, _service: &ServiceConfig) -> bool {
        self.exists.load(Ordering::SeqCst)
    }

    async fn pod_phase(&self, _service: &ServiceConfig) -> PodPhase {
        if let Some(phase) = self.phase_script.lock().unwrap().pop_front() {
            return phase;
        }
        *self.phase.lock().unwrap()
    }

    async fn scale_deployment(&self, _service: &ServiceConfig, replicas: i32) -> bool {
        if replicas < 0 || self.fail_scale.load(Ordering::SeqCst) {
            return false;
        }

        self.scale_calls.lock().unwrap().push(replicas);
        self.replicas.store(replicas, Ordering::SeqCst);

        if self.phase_follows_scale.load(Ordering::SeqCst) {
            *self.phase.lock().unwrap() = if replicas > 0 {
                PodPhase::Running
            } else {
                PodPhase::Unknown
            };
        }

        true
    }

    async fn replicas(&self, _service: &ServiceConfig) -> i32 {
        self.replicas.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Manager and Router Builders
// =============================================================================

/// Create a manager over the given services and orchestrator double.
pub fn make_manager(
    services: Vec<ServiceConfig>,
    orchestrator: Arc<FakeOrchestrator>,
) -> Arc<ServiceManager> {
    Arc::new(ServiceManager::new(make_config(services), orchestrator))
}

/// Create a full router plus the manager behind it.
pub fn make_app(
    services: Vec<ServiceConfig>,
    orchestrator: Arc<FakeOrchestrator>,
) -> (axum::Router, Arc<ServiceManager>) {
    let config = make_config(services);
    let manager = Arc::new(ServiceManager::new(Arc::clone(&config), orchestrator));
    let state = Arc::new(AppState::new(Arc::clone(&manager), config));
    (create_router(state), manager)
}
