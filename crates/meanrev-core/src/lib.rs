//! Core types and traits for the mean-reversion engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, IndicatorPoint, Timeframe)
//! - Per-bar signal records and sized orders
//! - Positions, closed trades and the simulation ledger
//! - Traits for indicators, indicator providers and data sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{to_decimal, DataError, EngineError, EngineResult, MeanRevError};
pub use traits::*;
pub use types::*;
