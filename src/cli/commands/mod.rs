//! CLI command implementations.

pub mod backtest;
pub mod signals;
pub mod sweep;
pub mod validate;

use anyhow::{Context, Result};
use meanrev_config::AppConfig;
use meanrev_core::types::Bar;
use meanrev_data::{load_csv, SessionFilter};
use std::path::Path;
use tracing::info;

use crate::cli::Overrides;

/// Apply CLI overrides and validate the result.
pub fn prepare(mut config: AppConfig, overrides: &Overrides) -> Result<AppConfig> {
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Load the configured bar file.
pub async fn load_bars(config: &AppConfig) -> Result<Vec<Bar>> {
    let path = config
        .data
        .path
        .as_deref()
        .context("No data file configured: pass --data <CSV> or set data.path")?;
    let bars = load_csv(path, &config.data.symbol, config.data.timeframe)
        .await
        .with_context(|| format!("Failed to load bars from {}", path.display()))?;
    Ok(bars)
}

/// The configured session filter, after checking it keeps at least one bar.
pub fn session_filter(config: &AppConfig, bars: &[Bar]) -> Result<Option<SessionFilter>> {
    let filter = config.session.filter()?;
    if let Some(filter) = &filter {
        let kept = filter.apply(bars)?;
        info!(
            timezone = %filter.timezone(),
            start = %filter.start(),
            end = %filter.end(),
            bars = kept.len(),
            "Session filter"
        );
    }
    Ok(filter)
}

/// Write `contents` to `path`, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}
