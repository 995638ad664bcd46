//! Default indicator provider.

use meanrev_core::error::{EngineError, EngineResult};
use meanrev_core::traits::{Indicator, IndicatorProvider};
use meanrev_core::types::{Bar, IndicatorPoint, IndicatorSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Atr, Ema, Rsi};

/// Right-align a shorter indicator output onto `len` input rows,
/// padding the warm-up rows with `None`.
pub fn align(values: &[f64], len: usize) -> Vec<Option<f64>> {
    let offset = len.saturating_sub(values.len());
    (0..len)
        .map(|i| i.checked_sub(offset).and_then(|j| values.get(j).copied()))
        .collect()
}

/// EMA of closes, RSI of closes and ATR of bars with configurable lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardIndicators {
    pub ema_length: usize,
    pub rsi_length: usize,
    pub atr_length: usize,
}

impl Default for StandardIndicators {
    fn default() -> Self {
        Self {
            ema_length: 50,
            rsi_length: 14,
            atr_length: 14,
        }
    }
}

impl StandardIndicators {
    /// Create a provider, rejecting zero lengths.
    pub fn new(ema_length: usize, rsi_length: usize, atr_length: usize) -> EngineResult<Self> {
        for (name, value) in [
            ("ema_length", ema_length),
            ("rsi_length", rsi_length),
            ("atr_length", atr_length),
        ] {
            if value == 0 {
                return Err(EngineError::InvalidParameter(format!(
                    "{} must be a positive integer",
                    name
                )));
            }
        }
        Ok(Self {
            ema_length,
            rsi_length,
            atr_length,
        })
    }
}

impl IndicatorProvider for StandardIndicators {
    fn compute(&self, bars: &[Bar]) -> EngineResult<IndicatorSet> {
        let provider = Self::new(self.ema_length, self.rsi_length, self.atr_length)?;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let len = bars.len();

        let ema = align(&Ema::new(provider.ema_length).calculate(&closes), len);
        let rsi = align(&Rsi::new(provider.rsi_length).calculate(&closes), len);
        let atr = align(&Atr::new(provider.atr_length).calculate_bars(bars), len);

        let set: IndicatorSet = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorPoint::new(bar.timestamp, ema[i], rsi[i], atr[i]))
            .collect();

        debug!(
            bars = len,
            ready = set.iter().filter(|p| p.is_ready()).count(),
            "Computed indicators"
        );

        Ok(set)
    }

    fn warmup_period(&self) -> usize {
        (self.ema_length.saturating_sub(1))
            .max(self.rsi_length)
            .max(self.atr_length)
    }

    fn name(&self) -> &str {
        "EMA/RSI/ATR"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let price = 100.0 + (i as f64 * 0.3).sin() * 4.0;
                Bar::new(i as i64 * 900_000, price, price + 1.0, price - 1.0, price)
            })
            .collect()
    }

    #[test]
    fn test_align() {
        assert_eq!(
            align(&[1.0, 2.0], 4),
            vec![None, None, Some(1.0), Some(2.0)]
        );
        assert_eq!(align(&[], 2), vec![None, None]);
    }

    #[test]
    fn test_compute_aligned_to_bars() {
        let provider = StandardIndicators::new(5, 3, 4).unwrap();
        let input = bars(20);
        let set = provider.compute(&input).unwrap();

        assert_eq!(set.len(), input.len());
        for (point, bar) in set.iter().zip(&input) {
            assert_eq!(point.timestamp, bar.timestamp);
        }

        let warmup = provider.warmup_period();
        assert_eq!(warmup, 4);
        assert!(set[..warmup].iter().all(|p| !p.is_ready()));
        assert!(set[warmup..].iter().all(|p| p.is_ready()));
    }

    #[test]
    fn test_value_depends_only_on_past() {
        let provider = StandardIndicators::new(5, 3, 4).unwrap();
        let mut input = bars(20);
        let before = provider.compute(&input).unwrap();

        input[15].close = 500.0;
        input[15].high = 501.0;
        let after = provider.compute(&input).unwrap();

        assert_eq!(before[..15], after[..15]);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            StandardIndicators::new(0, 14, 14),
            Err(EngineError::InvalidParameter(_))
        ));
        let bad = StandardIndicators {
            ema_length: 10,
            rsi_length: 0,
            atr_length: 14,
        };
        assert!(bad.compute(&bars(30)).is_err());
    }
}
