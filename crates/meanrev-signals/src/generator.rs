//! ATR-band mean-reversion signal generator.

use meanrev_core::error::{EngineError, EngineResult};
use meanrev_core::types::{Bar, IndicatorPoint, SideSignal, SignalRecord};
use tracing::debug;

use crate::{check_alignment, SignalConfig};

/// Produces one [`SignalRecord`] per bar.
///
/// Rules, with `k` the entry multiplier, `s`/`t` the stop/target multipliers:
/// - long entry: `low < EMA - k*ATR` and `RSI < threshold`
/// - short entry: `high > EMA + k*ATR` and `RSI < threshold`
/// - long SL/TP: `close - s*ATR` / `close + t*ATR`
/// - short SL/TP: `close + s*ATR` / `close - t*ATR`
/// - long exit: `close >= long TP` or `close <= long SL`
/// - short exit: `close <= short TP` or `close >= short SL`
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    /// Create a generator, validating its configuration.
    pub fn new(config: SignalConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Classify a single bar. `None` if the indicators are not all defined.
    pub fn evaluate(&self, bar: &Bar, point: &IndicatorPoint) -> Option<SignalRecord> {
        let (ema, rsi, atr) = point.values()?;
        let cfg = &self.config;
        let close = bar.close;
        let oversold_momentum = rsi < cfg.rsi_threshold;

        let long_sl = close - cfg.stop_atr_multiplier * atr;
        let long_tp = close + cfg.target_atr_multiplier * atr;
        let short_sl = close + cfg.stop_atr_multiplier * atr;
        let short_tp = close - cfg.target_atr_multiplier * atr;

        let band = cfg.entry_atr_multiplier * atr;

        Some(SignalRecord {
            timestamp: bar.timestamp,
            close,
            long: SideSignal {
                entry: bar.low < ema - band && oversold_momentum,
                exit: close >= long_tp || close <= long_sl,
                stop_loss: long_sl,
                take_profit: long_tp,
            },
            short: SideSignal {
                entry: bar.high > ema + band && oversold_momentum,
                exit: close <= short_tp || close >= short_sl,
                stop_loss: short_sl,
                take_profit: short_tp,
            },
        })
    }

    /// Generate signals for a warm-up-free, aligned series.
    ///
    /// Fails with `InsufficientData` when no bar has a full set of
    /// indicator values. Otherwise every bar must carry one; use
    /// [`trim_warmup`](crate::trim_warmup) first on raw provider output.
    pub fn generate(
        &self,
        bars: &[Bar],
        indicators: &[IndicatorPoint],
    ) -> EngineResult<Vec<SignalRecord>> {
        check_alignment(bars, indicators)?;
        if !indicators.iter().any(IndicatorPoint::is_ready) {
            return Err(EngineError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let records = bars
            .iter()
            .zip(indicators)
            .enumerate()
            .map(|(i, (bar, point))| {
                self.evaluate(bar, point).ok_or_else(|| {
                    EngineError::DataAlignment(format!(
                        "bar {} (timestamp {}) lacks indicator values",
                        i, bar.timestamp
                    ))
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        debug!(
            bars = records.len(),
            long_entries = records.iter().filter(|r| r.long.entry).count(),
            short_entries = records.iter().filter(|r| r.short.entry).count(),
            "Generated signals"
        );

        Ok(records)
    }
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self {
            config: SignalConfig::default(),
        }
    }
}
