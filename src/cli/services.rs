//! Services command implementation

use crate::cli::output::{format_services_json, format_services_table, ServiceView};
use crate::cli::ServicesArgs;
use crate::config::ParkaConfig;

/// Handle `parka services` command
pub fn handle_services(args: &ServicesArgs) -> anyhow::Result<String> {
    let config = if args.config.exists() {
        ParkaConfig::load(Some(&args.config))?
    } else {
        ParkaConfig::default()
    };

    let views: Vec<ServiceView> = config.services.iter().map(ServiceView::from).collect();

    if args.json {
        format_services_json(&views)
    } else if views.is_empty() {
        Ok(format!(
            "No services configured in {}",
            args.config.display()
        ))
    } else {
        Ok(format_services_table(&views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SERVICE_TOML: &str = r#"
    [[services]]
    name = "vllm"
    deployment = "vllm-server"
    selector_value = "vllm-server"
    host = "vllm.default.svc"
    port = 8000
    "#;

    #[test]
    fn test_services_table_output() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), SERVICE_TOML).unwrap();

        let args = ServicesArgs {
            json: false,
            config: temp.path().to_path_buf(),
        };

        let out = handle_services(&args).unwrap();
        assert!(out.contains("vllm-server"));
    }

    #[test]
    fn test_services_json_output() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), SERVICE_TOML).unwrap();

        let args = ServicesArgs {
            json: true,
            config: temp.path().to_path_buf(),
        };

        let out = handle_services(&args).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_services_missing_config_reports_empty() {
        let args = ServicesArgs {
            json: false,
            config: PathBuf::from("nonexistent.toml"),
        };

        let out = handle_services(&args).unwrap();
        assert!(out.contains("No services configured"));
    }
}
