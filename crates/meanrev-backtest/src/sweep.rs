//! Parameter sweep over independent backtests.

use std::cmp::Ordering;
use std::sync::Arc;

use meanrev_core::error::{EngineError, EngineResult};
use meanrev_core::types::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::engine::{Backtest, BacktestConfig};
use crate::statistics::BacktestStats;

/// Sweep errors. A failing combination is not one: it is reported in its
/// [`SweepResult`].
#[derive(Error, Debug)]
pub enum SweepError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Sweep task failed: {0}")]
    Join(#[from] JoinError),
}

/// Values tried for each swept parameter. Empty lists keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    pub ema_lengths: Vec<usize>,
    pub entry_multipliers: Vec<f64>,
    pub rsi_thresholds: Vec<f64>,
}

/// One point of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    pub ema_length: usize,
    pub entry_atr_multiplier: f64,
    pub rsi_threshold: f64,
}

impl SweepParams {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.ema_length
            .cmp(&other.ema_length)
            .then(self.entry_atr_multiplier.total_cmp(&other.entry_atr_multiplier))
            .then(self.rsi_threshold.total_cmp(&other.rsi_threshold))
    }

    fn apply(&self, base: &BacktestConfig) -> BacktestConfig {
        let mut config = *base;
        config.indicators.ema_length = self.ema_length;
        config.signals.entry_atr_multiplier = self.entry_atr_multiplier;
        config.signals.rsi_threshold = self.rsi_threshold;
        config
    }
}

impl ParameterGrid {
    /// Cartesian product, in parameter order.
    pub fn combinations(&self, base: &BacktestConfig) -> Vec<SweepParams> {
        let emas = or_base(&self.ema_lengths, base.indicators.ema_length);
        let entries = or_base(&self.entry_multipliers, base.signals.entry_atr_multiplier);
        let rsis = or_base(&self.rsi_thresholds, base.signals.rsi_threshold);

        let mut combos = Vec::with_capacity(emas.len() * entries.len() * rsis.len());
        for &ema_length in &emas {
            for &entry_atr_multiplier in &entries {
                for &rsi_threshold in &rsis {
                    combos.push(SweepParams {
                        ema_length,
                        entry_atr_multiplier,
                        rsi_threshold,
                    });
                }
            }
        }
        combos
    }
}

fn or_base<T: Copy>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

/// Outcome of one combination.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub params: SweepParams,
    pub outcome: EngineResult<BacktestStats>,
}

impl SweepResult {
    pub fn stats(&self) -> Option<&BacktestStats> {
        self.outcome.as_ref().ok()
    }
}

/// Run every grid combination as an independent blocking task.
///
/// Each task owns a handle to the same immutable bar snapshot and builds
/// its own backtest. Results come back sorted by total return (best
/// first), ties and failed runs ordered by parameters.
pub async fn run_sweep<F>(
    base: BacktestConfig,
    bars: Arc<[Bar]>,
    grid: &ParameterGrid,
    filter: Arc<F>,
) -> Result<Vec<SweepResult>, SweepError>
where
    F: Fn(&Bar) -> bool + Send + Sync + 'static,
{
    Backtest::new(base)?;
    let combos = grid.combinations(&base);
    info!(combinations = combos.len(), bars = bars.len(), "Starting sweep");

    let mut tasks = JoinSet::new();
    for params in combos {
        let bars = Arc::clone(&bars);
        let filter = Arc::clone(&filter);
        let config = params.apply(&base);
        tasks.spawn_blocking(move || {
            let outcome = Backtest::new(config)
                .and_then(|backtest| backtest.run_with_filter(&bars, |bar| (*filter)(bar)))
                .map(|report| report.stats);
            SweepResult { params, outcome }
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let result = joined?;
        match &result.outcome {
            Ok(stats) => debug!(
                ema_length = result.params.ema_length,
                entry = result.params.entry_atr_multiplier,
                rsi = result.params.rsi_threshold,
                trades = stats.total_trades,
                "Sweep run complete"
            ),
            Err(e) => warn!(
                ema_length = result.params.ema_length,
                entry = result.params.entry_atr_multiplier,
                rsi = result.params.rsi_threshold,
                error = %e,
                "Sweep run failed"
            ),
        }
        results.push(result);
    }

    // Completion order is nondeterministic
    results.sort_by(|a, b| a.params.cmp_key(&b.params));
    results.sort_by(|a, b| match (a.stats(), b.stats()) {
        (Some(x), Some(y)) => y.total_return_pct.cmp(&x.total_return_pct),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Ok(results)
}
