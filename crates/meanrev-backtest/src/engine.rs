//! Backtest pipeline.

use meanrev_core::error::{EngineError, EngineResult};
use meanrev_core::traits::IndicatorProvider;
use meanrev_core::types::{
    validate_series, Bar, IndicatorPoint, SignalRecord, Timeframe, REGULAR_SESSION_MINUTES,
};
use meanrev_indicators::StandardIndicators;
use meanrev_risk::PositionSizer;
use meanrev_signals::{trim_warmup, SignalConfig, SignalGenerator};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::report::BacktestReport;
use crate::simulator::{SimulationConfig, TradeSimulator};
use crate::statistics::BacktestStats;

/// Backtest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Indicator lengths
    pub indicators: StandardIndicators,
    /// Entry band, stop/target multipliers and RSI threshold
    pub signals: SignalConfig,
    /// Capital, fees and slippage
    pub simulation: SimulationConfig,
    /// Loss taken when a stop is hit
    pub risk_amount: Decimal,
    /// Bar interval, used to annualize ratios
    pub timeframe: Timeframe,
    /// Minutes of data per trading day
    pub session_minutes: u32,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            indicators: StandardIndicators::default(),
            signals: SignalConfig::default(),
            simulation: SimulationConfig::default(),
            risk_amount: dec!(1),
            timeframe: Timeframe::Minute15,
            session_minutes: REGULAR_SESSION_MINUTES,
        }
    }
}

impl BacktestConfig {
    pub fn periods_per_year(&self) -> f64 {
        self.timeframe.periods_per_year(self.session_minutes)
    }
}

/// Wires indicators, signals, sizing and simulation over one bar series.
///
/// Indicators are computed on the whole series. Warm-up bars are dropped,
/// then the optional bar filter (a trading session) is applied, so the
/// filter never shortens an indicator's history.
#[derive(Debug, Clone)]
pub struct Backtest {
    config: BacktestConfig,
    generator: SignalGenerator,
    simulator: TradeSimulator,
}

impl Backtest {
    /// Build a backtest, validating every stage's parameters.
    pub fn new(config: BacktestConfig) -> EngineResult<Self> {
        let indicators = &config.indicators;
        StandardIndicators::new(
            indicators.ema_length,
            indicators.rsi_length,
            indicators.atr_length,
        )?;
        if config.session_minutes == 0 {
            return Err(EngineError::InvalidParameter(
                "session_minutes must be positive".into(),
            ));
        }
        let generator = SignalGenerator::new(config.signals)?;
        let sizer = PositionSizer::new(config.risk_amount)?;
        let simulator = TradeSimulator::new(config.simulation, sizer)?;

        Ok(Self {
            config,
            generator,
            simulator,
        })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run over all bars.
    pub fn run(&self, bars: &[Bar]) -> EngineResult<BacktestReport> {
        self.run_with_filter(bars, |_| true)
    }

    /// Run over the bars accepted by `filter`, applied after warm-up trimming.
    pub fn run_with_filter<F>(&self, bars: &[Bar], filter: F) -> EngineResult<BacktestReport>
    where
        F: Fn(&Bar) -> bool,
    {
        let (bars, signals) = self.signals_with_filter(bars, filter)?;
        let ledger = self.simulator.run(&bars, &signals)?;
        let stats = BacktestStats::from_ledger(&ledger, self.config.periods_per_year());

        info!(
            bars = bars.len(),
            trades = stats.total_trades,
            total_return_pct = %stats.total_return_pct.round_dp(4),
            "Backtest complete"
        );

        Ok(BacktestReport {
            config: self.config,
            stats,
            ledger,
        })
    }

    /// Signal stage only: the bars that were evaluated and one record per bar.
    pub fn signals_with_filter<F>(
        &self,
        bars: &[Bar],
        filter: F,
    ) -> EngineResult<(Vec<Bar>, Vec<SignalRecord>)>
    where
        F: Fn(&Bar) -> bool,
    {
        validate_series(bars)?;
        let indicators = self.config.indicators.compute(bars)?;
        let (trimmed_bars, trimmed_points) = trim_warmup(bars, &indicators)?;

        let (kept_bars, kept_points): (Vec<Bar>, Vec<IndicatorPoint>) = trimmed_bars
            .into_iter()
            .zip(trimmed_points)
            .filter(|(bar, _)| filter(bar))
            .unzip();

        if kept_bars.is_empty() {
            return Err(EngineError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let records = self.generator.generate(&kept_bars, &kept_points)?;
        Ok((kept_bars, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meanrev_core::types::ExitReason;

    fn small_config() -> BacktestConfig {
        BacktestConfig {
            indicators: StandardIndicators::new(5, 3, 3).unwrap(),
            ..Default::default()
        }
    }

    /// A gentle oscillation with a sharp dip and a sharp spike.
    fn series() -> Vec<Bar> {
        let mut closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin())
            .collect();
        closes[20] = 95.0;
        closes[30] = 105.0;
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 900_000, c, c + 0.3, c - 0.3, c))
            .collect()
    }

    #[test]
    fn test_run_produces_one_equity_point_per_usable_bar() {
        let backtest = Backtest::new(small_config()).unwrap();
        let bars = series();
        let report = backtest.run(&bars).unwrap();

        // Warm-up is the longest defined-from index: ema 4, rsi 3, atr 3
        assert_eq!(report.ledger.equity_curve.len(), bars.len() - 4);
        assert_eq!(report.stats.bars_processed, bars.len() - 4);
        assert_eq!(
            report.ledger.final_equity(),
            report.stats.initial_capital + report.stats.total_pnl
        );
        assert!(report
            .ledger
            .trades
            .iter()
            .all(|t| t.exit_index >= t.entry_index));
    }

    #[test]
    fn test_last_bar_flat() {
        let backtest = Backtest::new(small_config()).unwrap();
        let report = backtest.run(&series()).unwrap();
        let last = report.ledger.equity_curve.last().unwrap();
        assert!(!last.has_exposure());
        assert!(report
            .ledger
            .trades
            .iter()
            .filter(|t| t.exit_reason == ExitReason::EndOfData)
            .all(|t| t.exit_index == report.stats.bars_processed - 1));
    }

    #[test]
    fn test_filter_applied_after_warmup() {
        let backtest = Backtest::new(small_config()).unwrap();
        let bars = series();
        let cutoff = bars[10].timestamp;

        let (kept, records) = backtest
            .signals_with_filter(&bars, |b| b.timestamp >= cutoff)
            .unwrap();
        assert_eq!(kept.len(), bars.len() - 10);
        assert_eq!(records.len(), kept.len());
        assert_eq!(records[0].timestamp, cutoff);
    }

    #[test]
    fn test_filter_removing_everything() {
        let backtest = Backtest::new(small_config()).unwrap();
        assert!(matches!(
            backtest.run_with_filter(&series(), |_| false),
            Err(EngineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_too_short_series() {
        let backtest = Backtest::new(BacktestConfig::default()).unwrap();
        assert!(matches!(
            backtest.run(&series()),
            Err(EngineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_invalid_series_rejected() {
        let backtest = Backtest::new(small_config()).unwrap();
        let mut bars = series();
        bars.swap(3, 4);
        assert!(matches!(
            backtest.run(&bars),
            Err(EngineError::DataAlignment(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BacktestConfig {
            risk_amount: dec!(-1),
            ..Default::default()
        };
        assert!(Backtest::new(config).is_err());

        let config = BacktestConfig {
            session_minutes: 0,
            ..Default::default()
        };
        assert!(Backtest::new(config).is_err());
    }

    #[test]
    fn test_deterministic() {
        let backtest = Backtest::new(small_config()).unwrap();
        let bars = series();
        let first = backtest.run(&bars).unwrap();
        let second = backtest.run(&bars).unwrap();
        assert_eq!(first.ledger, second.ledger);
        assert_eq!(first.stats, second.stats);
    }
}
