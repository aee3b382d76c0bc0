//! CLI module for Parka
//!
//! Command-line interface definitions and handlers for the Parka controller.
//!
//! # Commands
//!
//! - `serve` - Start the controller
//! - `services` - List managed services from the configuration
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the controller with default config
//! parka serve
//!
//! # List managed services
//! parka services --json
//!
//! # Generate shell completions
//! parka completions bash > ~/.bash_completion.d/parka
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod services;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use services::handle_services;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Parka - scale-to-zero autoscaler and reverse proxy for Kubernetes
#[derive(Parser, Debug)]
#[command(
    name = "parka",
    version,
    about = "Scale-to-zero autoscaler and reverse proxy for Kubernetes deployments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the controller
    Serve(ServeArgs),
    /// List managed services
    Services(ServicesArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "parka.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "PARKA_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "PARKA_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PARKA_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServicesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "parka.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "parka.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
