//! Signal generator configuration.

use meanrev_core::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Thresholds and ATR multipliers for the mean-reversion rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Distance from the EMA, in ATRs, that the bar extreme must exceed
    pub entry_atr_multiplier: f64,
    /// Stop distance from the close, in ATRs
    pub stop_atr_multiplier: f64,
    /// Target distance from the close, in ATRs
    pub target_atr_multiplier: f64,
    /// RSI must be strictly below this for either entry
    pub rsi_threshold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            entry_atr_multiplier: 1.5,
            stop_atr_multiplier: 1.0,
            target_atr_multiplier: 2.0,
            rsi_threshold: 50.0,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [
            ("entry_atr_multiplier", self.entry_atr_multiplier),
            ("stop_atr_multiplier", self.stop_atr_multiplier),
            ("target_atr_multiplier", self.target_atr_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.rsi_threshold) {
            return Err(EngineError::InvalidParameter(format!(
                "rsi_threshold must be within 0..=100, got {}",
                self.rsi_threshold
            )));
        }
        Ok(())
    }
}
