//! Configuration module for Parka
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PARKA_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use parka::config::ParkaConfig;
//!
//! // Load defaults
//! let config = ParkaConfig::default();
//! assert_eq!(config.server.port, 8000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: ParkaConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

pub mod error;
pub mod logging;
pub mod proxy;
pub mod server;
pub mod service;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use proxy::ProxyConfig;
pub use server::ServerConfig;
pub use service::ServiceConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Parka controller.
///
/// Aggregates the HTTP listener, proxy client, and logging settings together
/// with the table of managed services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParkaConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Outbound proxy client configuration
    pub proxy: ProxyConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Managed service definitions
    pub services: Vec<ServiceConfig>,
}

impl ParkaConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports PARKA_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("PARKA_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("PARKA_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("PARKA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PARKA_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for (i, service) in self.services.iter().enumerate() {
            if service.name.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].name", i),
                    message: "name cannot be empty".to_string(),
                });
            }
            if !seen.insert(service.name.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].name", i),
                    message: format!("duplicate service name '{}'", service.name),
                });
            }
            if service.deployment.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].deployment", i),
                    message: "deployment cannot be empty".to_string(),
                });
            }
            if service.selector_value.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].selector_value", i),
                    message: "selector_value cannot be empty".to_string(),
                });
            }
            if service.host.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].host", i),
                    message: "host cannot be empty".to_string(),
                });
            }
            if service.inactivity_timeout_seconds == 0 {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].inactivity_timeout_seconds", i),
                    message: "inactivity timeout must be non-zero".to_string(),
                });
            }
            if service.activation_timeout_seconds == 0 {
                return Err(ConfigError::Validation {
                    field: format!("services[{}].activation_timeout_seconds", i),
                    message: "activation timeout must be non-zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Look up a managed service by name.
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.name == name)
    }
}
