//! Parameter sweep command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use meanrev_backtest::{run_sweep, ParameterGrid};
use meanrev_config::AppConfig;
use meanrev_core::types::Bar;

use super::{load_bars, prepare, session_filter};
use crate::cli::SweepArgs;

pub async fn run(args: SweepArgs, config: AppConfig) -> Result<()> {
    let config = prepare(config, &args.overrides)?;
    let bars: Arc<[Bar]> = load_bars(&config).await?.into();
    let filter = session_filter(&config, &bars)?;

    let grid = ParameterGrid {
        ema_lengths: args.ema_lengths,
        entry_multipliers: args.entry_multipliers,
        rsi_thresholds: args.rsi_thresholds,
    };
    let results = run_sweep(
        config.backtest_config()?,
        bars,
        &grid,
        Arc::new(move |bar: &Bar| filter.map_or(true, |f| f.contains(bar))),
    )
    .await
    .context("Sweep failed")?;

    println!(
        "{:>5} {:>6} {:>6} {:>7} {:>10} {:>9} {:>8} {:>8}",
        "EMA", "ENTRY", "RSI", "TRADES", "RETURN %", "MAX DD %", "WIN %", "SHARPE"
    );
    println!("{}", "─".repeat(66));
    for result in results.iter().take(args.top) {
        let p = &result.params;
        match &result.outcome {
            Ok(stats) => println!(
                "{:>5} {:>6.2} {:>6.1} {:>7} {:>10.4} {:>9.4} {:>8.2} {:>8.2}",
                p.ema_length,
                p.entry_atr_multiplier,
                p.rsi_threshold,
                stats.total_trades,
                stats.total_return_pct,
                stats.max_drawdown_pct,
                stats.win_rate_pct,
                stats.sharpe_ratio
            ),
            Err(e) => println!(
                "{:>5} {:>6.2} {:>6.1}  failed: {}",
                p.ema_length, p.entry_atr_multiplier, p.rsi_threshold, e
            ),
        }
    }
    if results.len() > args.top {
        println!("... {} more", results.len() - args.top);
    }

    Ok(())
}
