//! Core traits for the engine.

mod data_source;
mod indicator;

pub use data_source::DataSource;
pub use indicator::{Indicator, IndicatorProvider};
