//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{LogFormat, ParkaConfig};
use crate::manager::ServiceManager;
use crate::orchestrator::KubectlClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &ServeArgs) -> anyhow::Result<ParkaConfig> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        ParkaConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ParkaConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(config: &crate::config::LoggingConfig) -> anyhow::Result<()> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    // 1. Load, merge, and validate configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting Parka controller");
    tracing::debug!(?config, "Loaded configuration");

    for service in &config.services {
        tracing::info!(
            service = %service.name,
            deployment = %service.deployment,
            namespace = %service.namespace,
            backend = %service.url_base(),
            "managing service"
        );
    }

    // 3. Build manager and API router
    let config = Arc::new(config);
    let manager = Arc::new(ServiceManager::new(
        Arc::clone(&config),
        Arc::new(KubectlClient::new()),
    ));
    let state = Arc::new(AppState::new(Arc::clone(&manager), Arc::clone(&config)));
    let app = create_router(state);

    // 4. Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %addr, "Parka controller listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 5. Cancel and await outstanding inactivity monitors
    tracing::info!("Waiting for inactivity monitors to stop");
    manager.shutdown().await;

    tracing::info!("Parka controller stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_serve_config_loading() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let args = ServeArgs {
            config: temp.path().to_path_buf(),
            port: None,
            host: None,
            log_level: None,
        };

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn test_serve_cli_overrides_config() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let args = ServeArgs {
            config: temp.path().to_path_buf(),
            port: Some(9000), // Override
            host: None,
            log_level: None,
        };

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 9000); // CLI wins
    }

    #[tokio::test]
    async fn test_serve_works_without_config_file() {
        let args = ServeArgs {
            config: PathBuf::from("nonexistent.toml"),
            port: None,
            host: None,
            log_level: None,
        };

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 8000); // Default
    }
}
