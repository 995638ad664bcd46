//! Per-bar trading signals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Both sides, in evaluation order.
    pub const ALL: [Side; 2] = [Side::Long, Side::Short];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// Entry/exit flags and protective levels for one side of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SideSignal {
    pub entry: bool,
    pub exit: bool,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Signal state of one bar for both sides.
///
/// Derived only from the bar and the indicator values of that same bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub timestamp: i64,
    /// Close of the bar; the reference price SL/TP are anchored to
    pub close: f64,
    pub long: SideSignal,
    pub short: SideSignal,
}

impl SignalRecord {
    /// Signal for one side.
    #[inline]
    pub fn side(&self, side: Side) -> &SideSignal {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }
}
