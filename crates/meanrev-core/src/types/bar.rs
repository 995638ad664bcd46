//! OHLC bar type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single price bar.
///
/// Uses f64 for fast indicator calculations. Bars are immutable inputs
/// once loaded; nothing in the engine mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds (UTC)
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Check that every price is positive and finite.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be positive and finite, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Validate a bar series: positive finite prices, strictly increasing timestamps.
pub fn validate_series(bars: &[Bar]) -> EngineResult<()> {
    for (i, bar) in bars.iter().enumerate() {
        bar.validate()
            .map_err(|reason| EngineError::InvalidParameter(format!("bar {}: {}", i, reason)))?;
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(EngineError::DataAlignment(format!(
                "bar {}: timestamp {} is not after {}",
                i,
                bar.timestamp,
                bars[i - 1].timestamp
            )));
        }
    }
    Ok(())
}
