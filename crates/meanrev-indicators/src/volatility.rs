//! Volatility indicators.

use meanrev_core::types::Bar;

use crate::momentum::wilder_smooth;

/// Average True Range (ATR).
///
/// Wilder-smoothed true range. The first value needs `period` true
/// ranges, and the first true range needs a previous close, so output
/// starts at input index `period`.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator. The usual period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate ATR from bars.
    pub fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.period + 1 {
            return vec![];
        }

        let tr: Vec<f64> = bars
            .windows(2)
            .map(|w| w[1].true_range(Some(w[0].close)))
            .collect();

        wilder_smooth(&tr, self.period)
    }
}
