//! Indicator values aligned to the bar index.

use serde::{Deserialize, Serialize};

/// EMA, RSI and ATR for one bar. `None` marks a warm-up value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorPoint {
    /// Timestamp of the bar these values belong to
    pub timestamp: i64,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorPoint {
    pub fn new(timestamp: i64, ema: Option<f64>, rsi: Option<f64>, atr: Option<f64>) -> Self {
        Self {
            timestamp,
            ema,
            rsi,
            atr,
        }
    }

    /// A fully defined point.
    pub fn defined(timestamp: i64, ema: f64, rsi: f64, atr: f64) -> Self {
        Self::new(timestamp, Some(ema), Some(rsi), Some(atr))
    }

    /// All three values, if every one is defined, finite, and ATR is positive.
    pub fn values(&self) -> Option<(f64, f64, f64)> {
        match (self.ema, self.rsi, self.atr) {
            (Some(ema), Some(rsi), Some(atr))
                if ema.is_finite() && rsi.is_finite() && atr.is_finite() && atr > 0.0 =>
            {
                Some((ema, rsi, atr))
            }
            _ => None,
        }
    }

    /// Whether this bar is usable for signal generation.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.values().is_some()
    }
}

/// Indicator series, one point per bar.
pub type IndicatorSet = Vec<IndicatorPoint>;
