//! Per-service mutable state.

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Last observed activity for a service.
///
/// Carries both a monotonic stamp (for inactivity math, driven by the tokio
/// clock so paused-time tests work) and a wall-clock stamp (for reporting).
#[derive(Debug, Clone, Copy)]
pub struct Activity {
    pub instant: Instant,
    pub at: DateTime<Utc>,
}

impl Activity {
    fn now() -> Self {
        Self {
            instant: Instant::now(),
            at: Utc::now(),
        }
    }
}

/// Mutable state for one managed service, created on first reference and
/// kept for the lifetime of the process.
///
/// The `activation` lock serializes the whole activation sequence
/// (exists check, phase check, scale-up, readiness wait) so two concurrent
/// requests can never both observe "not running" and both issue a scale-up.
/// The monitor slot is guarded separately: spawn-if-absent and the monitor's
/// own self-clear go through the same mutex.
pub struct ServiceEntry {
    pub(crate) activation: AsyncMutex<()>,
    last_activity: Mutex<Activity>,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceEntry {
    pub fn new() -> Self {
        Self {
            activation: AsyncMutex::new(()),
            last_activity: Mutex::new(Activity::now()),
            monitor: Mutex::new(None),
        }
    }

    /// Stamp the current time as the last activity.
    pub fn touch(&self) {
        *self.last_activity.lock().expect("activity lock poisoned") = Activity::now();
    }

    /// Last recorded activity.
    pub fn last_activity(&self) -> Activity {
        *self.last_activity.lock().expect("activity lock poisoned")
    }

    /// Time elapsed since the last recorded activity.
    pub fn idle_for(&self) -> Duration {
        self.last_activity().instant.elapsed()
    }

    /// Whether a monitor handle is currently recorded.
    pub fn monitor_active(&self) -> bool {
        self.monitor.lock().expect("monitor lock poisoned").is_some()
    }

    /// Spawn a monitor task if none is recorded, holding the slot lock across
    /// the spawn so the task's own self-clear cannot interleave. Returns true
    /// if a task was spawned.
    pub(crate) fn spawn_monitor_if_absent<F>(&self, spawn: F) -> bool
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        let mut slot = self.monitor.lock().expect("monitor lock poisoned");
        if slot.is_some() {
            return false;
        }
        *slot = Some(spawn());
        true
    }

    /// Clear the monitor slot. Called by the monitor task itself on exit.
    pub(crate) fn clear_monitor(&self) {
        *self.monitor.lock().expect("monitor lock poisoned") = None;
    }

    /// Take the monitor handle, if any, leaving the slot empty.
    pub(crate) fn take_monitor(&self) -> Option<JoinHandle<()>> {
        self.monitor.lock().expect("monitor lock poisoned").take()
    }
}

impl Default for ServiceEntry {
    fn default() -> Self {
        Self::new()
    }
}
