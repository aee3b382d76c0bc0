//! Config command handlers

use crate::cli::ConfigInitArgs;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../parka.example.toml");

/// Handle `parka config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> anyhow::Result<()> {
    // Check if file exists
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  Edit this file to define your managed services.");

    Ok(())
}
