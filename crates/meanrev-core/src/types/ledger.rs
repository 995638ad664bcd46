//! Simulation ledger: closed trades plus the per-bar equity curve.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExitReason, Side, Trade};

/// Account state sampled once per bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    /// Initial capital plus realized P&L up to and including this bar
    pub equity: Decimal,
    /// Size of the open long position after this bar (zero when flat)
    pub long_size: Decimal,
    /// Size of the open short position after this bar (zero when flat)
    pub short_size: Decimal,
}

impl EquityPoint {
    pub fn has_exposure(&self) -> bool {
        self.long_size > Decimal::ZERO || self.short_size > Decimal::ZERO
    }
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub initial_capital: Decimal,
    /// Closed trades in the order they were closed
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    /// Entry triggers dropped because the stop distance was zero
    pub dropped_signals: usize,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            dropped_signals: 0,
        }
    }

    /// Append a closed trade.
    pub fn add_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Append an equity sample.
    pub fn record_equity(&mut self, point: EquityPoint) {
        self.equity_curve.push(point);
    }

    /// Sum of realized P&L over all trades.
    pub fn realized_pnl(&self) -> Decimal {
        self.trades.iter().map(|t| t.pnl).sum()
    }

    /// Equity on the last bar, or initial capital if nothing was simulated.
    pub fn final_equity(&self) -> Decimal {
        self.equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital)
    }

    /// Trades for one side.
    pub fn trades_for(&self, side: Side) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(move |t| t.side == side)
    }

    /// Number of trades closed for a given reason.
    pub fn count_by_reason(&self, reason: ExitReason) -> usize {
        self.trades.iter().filter(|t| t.exit_reason == reason).count()
    }
}
