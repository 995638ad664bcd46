//! Fixed fractional-risk position sizing.

use meanrev_core::error::{to_decimal, EngineError, EngineResult};
use meanrev_core::types::{Side, SignalRecord, SizedOrder};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// `risk_amount / |entry_price - stop_loss_price|`, or zero when the two
/// prices coincide. Never fails on a zero distance.
pub fn risk_based_size(
    entry_price: Decimal,
    stop_loss_price: Decimal,
    risk_amount: Decimal,
) -> EngineResult<Decimal> {
    let distance = (entry_price - stop_loss_price).abs();
    if distance.is_zero() {
        return Ok(Decimal::ZERO);
    }
    risk_amount.checked_div(distance).ok_or_else(|| {
        EngineError::InvalidParameter(format!(
            "position size overflows for risk {} over stop distance {}",
            risk_amount, distance
        ))
    })
}

/// Sizes entries so that hitting the stop loses `risk_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizer {
    risk_amount: Decimal,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self {
            risk_amount: dec!(1),
        }
    }
}

impl PositionSizer {
    /// Create a sizer. Negative risk is rejected.
    pub fn new(risk_amount: Decimal) -> EngineResult<Self> {
        if risk_amount.is_sign_negative() && !risk_amount.is_zero() {
            return Err(EngineError::InvalidParameter(format!(
                "risk_amount must not be negative, got {}",
                risk_amount
            )));
        }
        Ok(Self { risk_amount })
    }

    pub fn risk_amount(&self) -> Decimal {
        self.risk_amount
    }

    /// Size for a given entry and stop price.
    pub fn size(&self, entry_price: f64, stop_loss_price: f64) -> EngineResult<Decimal> {
        let entry = to_decimal(entry_price, "entry price")?;
        let stop = to_decimal(stop_loss_price, "stop-loss price")?;
        risk_based_size(entry, stop, self.risk_amount)
    }

    /// Size each `(entry, stop)` pair.
    pub fn size_all(&self, pairs: &[(f64, f64)]) -> EngineResult<Vec<Decimal>> {
        pairs
            .iter()
            .map(|&(entry, stop)| self.size(entry, stop))
            .collect()
    }

    /// Build the sized order for one side of a bar's signal.
    ///
    /// The stop distance is measured from the bar close, the price the
    /// signal levels are anchored to.
    pub fn size_order(
        &self,
        side: Side,
        bar_index: usize,
        record: &SignalRecord,
    ) -> EngineResult<SizedOrder> {
        let signal = record.side(side);
        let size = self.size(record.close, signal.stop_loss)?;
        trace!(bar = bar_index, %side, %size, "Sized order");
        Ok(SizedOrder {
            side,
            bar_index,
            reference_price: record.close,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            size,
        })
    }
}
