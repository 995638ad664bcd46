//! Open positions and closed trades.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Side;
use crate::error::{EngineError, EngineResult};

/// Scale of trade P&L and fees. Fixed so that equity, the running sum of
/// trade P&L, is exact.
pub const PNL_DECIMAL_PLACES: u32 = 10;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Force-closed on the final bar of the series
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::EndOfData => "end_of_data",
        };
        write!(f, "{}", s)
    }
}

/// An open position on one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    pub entry_index: usize,
    pub entry_timestamp: i64,
    /// Fill price, slippage included
    pub entry_price: Decimal,
    pub size: Decimal,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Position {
    /// Whether a close at `price` reaches the stop.
    pub fn stop_hit(&self, price: f64) -> bool {
        match self.side {
            Side::Long => price <= self.stop_loss,
            Side::Short => price >= self.stop_loss,
        }
    }

    /// Whether a close at `price` reaches the target.
    pub fn target_hit(&self, price: f64) -> bool {
        match self.side {
            Side::Long => price >= self.take_profit,
            Side::Short => price <= self.take_profit,
        }
    }

    /// P&L of closing the position at `exit_price`, before fees, rounded
    /// to [`PNL_DECIMAL_PLACES`].
    pub fn gross_pnl(&self, exit_price: Decimal) -> EngineResult<Decimal> {
        let move_per_unit = match self.side {
            Side::Long => exit_price.checked_sub(self.entry_price),
            Side::Short => self.entry_price.checked_sub(exit_price),
        };
        move_per_unit
            .and_then(|m| m.checked_mul(self.size))
            .map(|pnl| pnl.round_dp(PNL_DECIMAL_PLACES))
            .ok_or_else(|| overflow("gross P&L", self.size))
    }

    /// Close the position and produce the resulting trade.
    ///
    /// Fees are charged on the notional of both fills:
    /// `fee_rate * size * (entry_price + exit_price)`. Gross P&L and fees
    /// are rounded to [`PNL_DECIMAL_PLACES`] so ledger sums stay exact.
    pub fn close(
        self,
        exit_index: usize,
        exit_timestamp: i64,
        exit_price: Decimal,
        exit_reason: ExitReason,
        fee_rate: Decimal,
    ) -> EngineResult<Trade> {
        let gross_pnl = self.gross_pnl(exit_price)?;
        let fees = self
            .entry_price
            .checked_add(exit_price)
            .and_then(|notional| notional.checked_mul(self.size))
            .and_then(|notional| notional.checked_mul(fee_rate))
            .map(|fees| fees.round_dp(PNL_DECIMAL_PLACES))
            .ok_or_else(|| overflow("fees", self.size))?;
        let pnl = gross_pnl
            .checked_sub(fees)
            .ok_or_else(|| overflow("net P&L", self.size))?;

        Ok(Trade {
            side: self.side,
            entry_index: self.entry_index,
            entry_timestamp: self.entry_timestamp,
            entry_price: self.entry_price,
            size: self.size,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            exit_index,
            exit_timestamp,
            exit_price,
            exit_reason,
            gross_pnl,
            fees,
            pnl,
        })
    }
}

fn overflow(what: &str, size: Decimal) -> EngineError {
    EngineError::InvalidParameter(format!(
        "{} overflows for position size {}",
        what, size
    ))
}

/// A closed position. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: Side,
    pub entry_index: usize,
    pub entry_timestamp: i64,
    pub entry_price: Decimal,
    pub size: Decimal,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub exit_index: usize,
    pub exit_timestamp: i64,
    pub exit_price: Decimal,
    pub exit_reason: ExitReason,
    pub gross_pnl: Decimal,
    pub fees: Decimal,
    /// Realized P&L after fees
    pub pnl: Decimal,
}

impl Trade {
    /// Number of bars the position was held.
    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }

    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: Side, entry: Decimal, size: Decimal) -> Position {
        Position {
            side,
            entry_index: 0,
            entry_timestamp: 0,
            entry_price: entry,
            size,
            stop_loss: 99.0,
            take_profit: 102.0,
        }
    }

    #[test]
    fn test_long_trade_pnl_with_fees() {
        let trade = position(Side::Long, dec!(100), dec!(1)).close(
            2,
            2,
            dec!(102),
            ExitReason::TakeProfit,
            dec!(0.0001),
        )
        .unwrap();
        assert_eq!(trade.gross_pnl, dec!(2));
        assert_eq!(trade.fees, dec!(0.0202));
        assert_eq!(trade.pnl, dec!(1.9798));
        assert!(trade.is_win());
        assert_eq!(trade.bars_held(), 2);
    }

    #[test]
    fn test_short_trade_pnl() {
        let trade = position(Side::Short, dec!(100), dec!(2)).close(
            1,
            1,
            dec!(103),
            ExitReason::StopLoss,
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(trade.pnl, dec!(-6));
        assert!(trade.is_loss());
    }

    #[test]
    fn test_level_checks() {
        let long = position(Side::Long, dec!(100), dec!(1));
        assert!(long.stop_hit(99.0));
        assert!(!long.stop_hit(99.5));
        assert!(long.target_hit(102.0));

        let mut short = position(Side::Short, dec!(100), dec!(1));
        short.stop_loss = 101.0;
        short.take_profit = 98.0;
        assert!(short.stop_hit(101.0));
        assert!(short.target_hit(97.5));
        assert!(!short.target_hit(98.5));
    }

    #[test]
    fn test_pnl_and_fees_rounded_to_fixed_scale() {
        let size = dec!(1.2990387113535497364614734893);
        let trade = position(Side::Long, dec!(100.00500000000001), size)
            .close(1, 1, dec!(101.37200000001), ExitReason::TakeProfit, dec!(0.0007))
            .unwrap();

        assert!(trade.gross_pnl.scale() <= PNL_DECIMAL_PLACES);
        assert!(trade.fees.scale() <= PNL_DECIMAL_PLACES);
        assert_eq!(trade.pnl, trade.gross_pnl - trade.fees);
        // Adding to a small equity loses nothing
        assert_eq!((dec!(100) + trade.pnl) - dec!(100), trade.pnl);
    }

    #[test]
    fn test_overflowing_size_is_an_error() {
        let huge = position(Side::Long, dec!(100), Decimal::MAX);
        assert!(matches!(
            huge.close(1, 1, dec!(102), ExitReason::TakeProfit, Decimal::ZERO),
            Err(EngineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_exit_reason_display() {
        assert_eq!(ExitReason::EndOfData.to_string(), "end_of_data");
    }
}
