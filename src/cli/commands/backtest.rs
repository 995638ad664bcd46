//! Backtest command implementation.

use anyhow::{Context, Result};
use meanrev_backtest::Backtest;
use meanrev_config::AppConfig;
use tracing::info;

use super::{load_bars, prepare, session_filter, write_output};
use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config: AppConfig) -> Result<()> {
    let config = prepare(config, &args.overrides)?;
    info!(
        symbol = %config.data.symbol,
        timeframe = %config.data.timeframe,
        "Starting backtest"
    );

    let bars = load_bars(&config).await?;
    let filter = session_filter(&config, &bars)?;
    let backtest = Backtest::new(config.backtest_config()?)?;

    let report = match filter {
        Some(filter) => backtest.run_with_filter(&bars, |bar| filter.contains(bar)),
        None => backtest.run(&bars),
    }
    .context("Backtest failed")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(path) = &args.save {
        write_output(Some(path), &report.to_json()?)?;
    }
    if let Some(path) = &args.trades_csv {
        write_output(Some(path), &report.trades_to_csv()?)?;
    }
    if let Some(path) = &args.equity_csv {
        write_output(Some(path), &report.equity_to_csv()?)?;
    }

    Ok(())
}
