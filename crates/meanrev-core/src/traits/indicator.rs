//! Indicator trait definitions.

use crate::error::{EngineError, EngineResult};
use crate::types::{Bar, IndicatorSet};

/// Trait for batch technical indicators.
///
/// Output is shorter than the input by the warm-up length; the first
/// output value belongs to input index `data.len() - output.len()`.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> EngineResult<()> {
        if data.len() < self.period() {
            return Err(EngineError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Supplies EMA, RSI and ATR aligned one-to-one with a bar series.
///
/// Implementations are pure: the same bars always yield the same set,
/// and the value at index `i` depends only on bars `0..=i`.
pub trait IndicatorProvider: Send + Sync {
    /// Compute one indicator point per bar. Warm-up values are `None`.
    fn compute(&self, bars: &[Bar]) -> EngineResult<IndicatorSet>;

    /// Number of leading bars without a full set of values.
    fn warmup_period(&self) -> usize;

    fn name(&self) -> &str;
}
