//! Proxy client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the outbound HTTP client used to forward requests.
///
/// These timeouts are a separate concern from activation timeouts: they bound
/// the proxied call to an already-running backend, not the scale-up wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Total timeout for a forwarded request, in seconds
    pub timeout_seconds: u64,
    /// Connect timeout for the backend socket, in seconds
    pub connect_timeout_seconds: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 5,
        }
    }
}
