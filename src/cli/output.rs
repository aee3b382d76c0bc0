//! Output formatting helpers for CLI commands

use crate::config::ServiceConfig;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// View model for service display
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceView {
    pub name: String,
    pub deployment: String,
    pub namespace: String,
    pub backend: String,
    pub inactivity_timeout_seconds: u64,
    pub activation_timeout_seconds: u64,
}

impl From<&ServiceConfig> for ServiceView {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            name: service.name.clone(),
            deployment: service.deployment.clone(),
            namespace: service.namespace.clone(),
            backend: service.url_base(),
            inactivity_timeout_seconds: service.inactivity_timeout_seconds,
            activation_timeout_seconds: service.activation_timeout_seconds,
        }
    }
}

/// Format services as a table
pub fn format_services_table(services: &[ServiceView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Name",
        "Deployment",
        "Namespace",
        "Backend",
        "Idle timeout",
        "Activation timeout",
    ]);

    for s in services {
        table.add_row(vec![
            Cell::new(s.name.green().to_string()),
            Cell::new(&s.deployment),
            Cell::new(&s.namespace),
            Cell::new(&s.backend),
            Cell::new(format!("{}s", s.inactivity_timeout_seconds)),
            Cell::new(format!("{}s", s.activation_timeout_seconds)),
        ]);
    }

    table.to_string()
}

/// Format services as pretty JSON
pub fn format_services_json(services: &[ServiceView]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(services)?)
}
