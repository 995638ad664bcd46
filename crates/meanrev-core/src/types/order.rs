//! Sized entry orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// A prospective entry with its risk-based size.
///
/// A zero size marks a degenerate signal (stop at the entry price);
/// it is never traded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizedOrder {
    pub side: Side,
    /// Index of the bar that produced the signal
    pub bar_index: usize,
    /// Price the stop distance is measured from (the bar close)
    pub reference_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub size: Decimal,
}

impl SizedOrder {
    /// Whether the order can open a position.
    #[inline]
    pub fn is_tradeable(&self) -> bool {
        self.size > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_size_not_tradeable() {
        let mut order = SizedOrder {
            side: Side::Long,
            bar_index: 3,
            reference_price: 100.0,
            stop_loss: 100.0,
            take_profit: 100.0,
            size: Decimal::ZERO,
        };
        assert!(!order.is_tradeable());

        order.size = dec!(0.5);
        assert!(order.is_tradeable());
    }
}
