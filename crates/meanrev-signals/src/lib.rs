//! Mean-reversion signal generation.
//!
//! Each bar is classified independently from its own OHLC and indicator
//! values: long/short entry triggers, exit triggers and the stop-loss and
//! take-profit levels anchored to the bar close. Whether a trigger is
//! actionable is decided later by the simulator.

mod config;
mod generator;
mod warmup;

pub use config::SignalConfig;
pub use generator::SignalGenerator;
pub use warmup::{check_alignment, trim_warmup};
