//! Technical indicators feeding the signal generator.
//!
//! - Exponential moving average (SMA-seeded)
//! - Relative strength index (Wilder smoothing)
//! - Average true range (Wilder smoothing)
//!
//! [`StandardIndicators`] aligns all three onto the bar index and is the
//! default [`IndicatorProvider`](meanrev_core::IndicatorProvider).

pub mod momentum;
pub mod moving_average;
mod provider;
pub mod volatility;

pub use momentum::Rsi;
pub use moving_average::Ema;
pub use provider::{align, StandardIndicators};
pub use volatility::Atr;
