//! Risk management for the mean-reversion engine.
//!
//! Positions are sized so that a stop-out loses a fixed amount.

mod position_sizer;

pub use position_sizer::{risk_based_size, PositionSizer};
