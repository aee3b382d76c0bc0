//! Managed service configuration

use serde::{Deserialize, Serialize};

/// Configuration for a single managed service.
///
/// Each service maps to one Kubernetes Deployment that Parka scales between
/// zero and one replicas. The backend address (`host`/`port`) is where
/// proxied traffic goes once the deployment reports a running pod.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name, used as the first path segment of proxied requests
    pub name: String,
    /// Name of the Deployment backing this service
    pub deployment: String,
    /// Pod selector label key
    #[serde(default = "default_selector_label")]
    pub selector_label: String,
    /// Pod selector label value
    pub selector_value: String,
    /// Backend host traffic is forwarded to
    pub host: String,
    /// Backend port traffic is forwarded to
    pub port: u16,
    /// Kubernetes namespace the deployment lives in
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Seconds without proxied traffic before scaling back to zero
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_seconds: u64,
    /// Seconds to wait for a pod to reach Running during activation
    #[serde(default = "default_activation_timeout")]
    pub activation_timeout_seconds: u64,
}

fn default_selector_label() -> String {
    "app".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_inactivity_timeout() -> u64 {
    900
}

fn default_activation_timeout() -> u64 {
    120
}

impl ServiceConfig {
    /// Base URL for the service backend.
    pub fn url_base(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
        name = "vllm"
        deployment = "vllm-server"
        selector_value = "vllm-server"
        host = "vllm.default.svc"
        port = 8000
        "#
    }

    #[test]
    fn test_service_config_field_defaults() {
        let config: ServiceConfig = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.selector_label, "app");
        assert_eq!(config.namespace, "default");
        assert_eq!(config.inactivity_timeout_seconds, 900);
        assert_eq!(config.activation_timeout_seconds, 120);
    }

    #[test]
    fn test_service_config_url_base() {
        let config: ServiceConfig = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.url_base(), "http://vllm.default.svc:8000");
    }

    #[test]
    fn test_service_config_explicit_values_win() {
        let toml = r#"
        name = "embedder"
        deployment = "embedder"
        selector_label = "component"
        selector_value = "embedder"
        host = "embedder.models.svc"
        port = 9090
        namespace = "models"
        inactivity_timeout_seconds = 300
        activation_timeout_seconds = 60
        "#;

        let config: ServiceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.selector_label, "component");
        assert_eq!(config.namespace, "models");
        assert_eq!(config.inactivity_timeout_seconds, 300);
        assert_eq!(config.activation_timeout_seconds, 60);
    }
}
