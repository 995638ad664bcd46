//! Signal dump command implementation.

use anyhow::{Context, Result};
use meanrev_backtest::{signals_to_csv, Backtest};
use meanrev_config::AppConfig;
use tracing::info;

use super::{load_bars, prepare, session_filter, write_output};
use crate::cli::SignalsArgs;

pub async fn run(args: SignalsArgs, config: AppConfig) -> Result<()> {
    let config = prepare(config, &args.overrides)?;
    let bars = load_bars(&config).await?;
    let filter = session_filter(&config, &bars)?;
    let backtest = Backtest::new(config.backtest_config()?)?;

    let (_, records) = backtest
        .signals_with_filter(&bars, |bar| filter.map_or(true, |f| f.contains(bar)))
        .context("Signal generation failed")?;

    info!(
        records = records.len(),
        long_entries = records.iter().filter(|r| r.long.entry).count(),
        short_entries = records.iter().filter(|r| r.short.entry).count(),
        "Generated signals"
    );

    write_output(args.out.as_deref(), &signals_to_csv(&records)?)
}
