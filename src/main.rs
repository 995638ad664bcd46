//! Mean-reversion backtester CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use meanrev_config::load_config;
use meanrev_monitor::{setup_logging, LogFormat};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Setup logging
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        config
            .logging
            .format
            .parse()
            .map_err(anyhow::Error::msg)
            .context("Invalid logging.format")?
    };
    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.logging.file.as_ref().map(PathBuf::from));
    let _guard = setup_logging(&level, format, log_dir.as_deref())
        .context("Failed to initialize logging")?;

    // Execute command
    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, config).await,
        Commands::Signals(args) => cli::commands::signals::run(args, config).await,
        Commands::Sweep(args) => cli::commands::sweep::run(args, config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, config).await,
    }
}
