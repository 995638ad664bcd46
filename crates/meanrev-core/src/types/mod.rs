//! Core data types for the engine.

mod bar;
mod indicator;
mod ledger;
mod order;
mod position;
mod signal;
mod timeframe;

pub use bar::{validate_series, Bar};
pub use indicator::{IndicatorPoint, IndicatorSet};
pub use ledger::{EquityPoint, Ledger};
pub use order::SizedOrder;
pub use position::{ExitReason, Position, Trade, PNL_DECIMAL_PLACES};
pub use signal::{Side, SideSignal, SignalRecord};
pub use timeframe::{Timeframe, REGULAR_SESSION_MINUTES, TRADING_DAYS_PER_YEAR};
