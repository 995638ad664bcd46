//! Per-side trade lifecycle simulation.

use meanrev_core::error::{to_decimal, EngineError, EngineResult};
use meanrev_core::types::{
    Bar, EquityPoint, ExitReason, Ledger, Position, Side, SideSignal, SignalRecord,
};
use meanrev_risk::PositionSizer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Cost model and starting capital of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_capital: Decimal,
    /// Fee charged on the notional of each fill, as a fraction
    pub fee_rate: Decimal,
    /// Unfavourable fill adjustment, as a fraction of the close
    pub slippage: Decimal,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: dec!(100),
            fee_rate: dec!(0.0001),
            slippage: dec!(0.00005),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.fee_rate < Decimal::ZERO {
            return Err(EngineError::InvalidParameter(format!(
                "fee_rate must not be negative, got {}",
                self.fee_rate
            )));
        }
        if self.slippage < Decimal::ZERO || self.slippage >= Decimal::ONE {
            return Err(EngineError::InvalidParameter(format!(
                "slippage must be within [0, 1), got {}",
                self.slippage
            )));
        }
        Ok(())
    }

    /// Fill price for opening a position on `side` at `close`.
    pub fn entry_fill(&self, side: Side, close: Decimal) -> EngineResult<Decimal> {
        let factor = match side {
            Side::Long => Decimal::ONE + self.slippage,
            Side::Short => Decimal::ONE - self.slippage,
        };
        fill(close, factor)
    }

    /// Fill price for closing a position on `side` at `close`.
    pub fn exit_fill(&self, side: Side, close: Decimal) -> EngineResult<Decimal> {
        let factor = match side {
            Side::Long => Decimal::ONE - self.slippage,
            Side::Short => Decimal::ONE + self.slippage,
        };
        fill(close, factor)
    }
}

fn fill(close: Decimal, factor: Decimal) -> EngineResult<Decimal> {
    close.checked_mul(factor).ok_or_else(|| {
        EngineError::InvalidParameter(format!("fill price overflows for close {}", close))
    })
}

/// State of one side between bars.
#[derive(Debug, Clone, PartialEq)]
enum SideState {
    Flat,
    Open(Position),
}

impl SideState {
    fn size(&self) -> Decimal {
        match self {
            SideState::Flat => Decimal::ZERO,
            SideState::Open(position) => position.size,
        }
    }
}

/// Decide whether an open position exits on `bar`, and why.
///
/// The position's own levels (fixed at entry) are checked against the
/// close; the bar's exit flag also closes it. When the stop is touched
/// anywhere in the bar the exit counts as a stop-loss, so a bar that
/// reaches both levels resolves to `StopLoss`.
fn exit_reason(position: &Position, bar: &Bar, signal: &SideSignal) -> Option<ExitReason> {
    let adverse_extreme = match position.side {
        Side::Long => bar.low,
        Side::Short => bar.high,
    };
    let stop_touched = position.stop_hit(bar.close) || position.stop_hit(adverse_extreme);

    if position.stop_hit(bar.close) || position.target_hit(bar.close) {
        return Some(if stop_touched {
            ExitReason::StopLoss
        } else {
            ExitReason::TakeProfit
        });
    }

    if signal.exit {
        let signal_stop = match position.side {
            Side::Long => bar.close <= signal.stop_loss,
            Side::Short => bar.close >= signal.stop_loss,
        };
        return Some(if signal_stop || stop_touched {
            ExitReason::StopLoss
        } else {
            ExitReason::TakeProfit
        });
    }

    None
}

/// Single-pass simulator holding at most one position per side.
///
/// Each bar, per side independently:
/// 1. `Open` and exit triggered: close at the slipped close, go `Flat`.
/// 2. `Flat` and entry triggered with size > 0: open at the slipped close.
/// 3. `Flat` and entry triggered with size 0: drop the signal.
///
/// A side that closes on a bar cannot reopen on that bar. Positions still
/// open on the last bar are closed there with [`ExitReason::EndOfData`].
#[derive(Debug, Clone)]
pub struct TradeSimulator {
    config: SimulationConfig,
    sizer: PositionSizer,
}

impl TradeSimulator {
    /// Create a simulator, validating the cost model.
    pub fn new(config: SimulationConfig, sizer: PositionSizer) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config, sizer })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    fn check_alignment(bars: &[Bar], signals: &[SignalRecord]) -> EngineResult<()> {
        if bars.len() != signals.len() {
            return Err(EngineError::length_mismatch(
                "bars",
                bars.len(),
                "signals",
                signals.len(),
            ));
        }
        for (i, (bar, record)) in bars.iter().zip(signals).enumerate() {
            if bar.timestamp != record.timestamp {
                return Err(EngineError::timestamp_mismatch(
                    i,
                    bar.timestamp,
                    record.timestamp,
                ));
            }
        }
        if bars.is_empty() {
            return Err(EngineError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        Ok(())
    }

    /// Run the simulation and return the ledger.
    pub fn run(&self, bars: &[Bar], signals: &[SignalRecord]) -> EngineResult<Ledger> {
        Self::check_alignment(bars, signals)?;

        let mut ledger = Ledger::new(self.config.initial_capital);
        let mut equity = self.config.initial_capital;
        let mut long = SideState::Flat;
        let mut short = SideState::Flat;
        let last = bars.len() - 1;

        for (i, (bar, record)) in bars.iter().zip(signals).enumerate() {
            let close = to_decimal(bar.close, "close")?;

            for side in Side::ALL {
                let state = match side {
                    Side::Long => &mut long,
                    Side::Short => &mut short,
                };
                let signal = record.side(side);

                match state {
                    SideState::Open(position) => {
                        let Some(reason) = exit_reason(position, bar, signal) else {
                            continue;
                        };
                        if let SideState::Open(position) =
                            std::mem::replace(state, SideState::Flat)
                        {
                            let pnl = self.close_position(
                                &mut ledger,
                                position,
                                i,
                                bar,
                                close,
                                reason,
                            )?;
                            equity = add_pnl(equity, pnl)?;
                        }
                    }
                    SideState::Flat => {
                        if !signal.entry {
                            continue;
                        }
                        let order = self.sizer.size_order(side, i, record)?;
                        if !order.is_tradeable() {
                            warn!(
                                bar = i,
                                timestamp = bar.timestamp,
                                %side,
                                close = bar.close,
                                stop_loss = order.stop_loss,
                                "Degenerate signal: zero stop distance, entry dropped"
                            );
                            ledger.dropped_signals += 1;
                            continue;
                        }
                        let entry_price = self.config.entry_fill(side, close)?;
                        debug!(
                            bar = i,
                            %side,
                            price = %entry_price,
                            size = %order.size,
                            stop_loss = order.stop_loss,
                            take_profit = order.take_profit,
                            "Opened position"
                        );
                        *state = SideState::Open(Position {
                            side,
                            entry_index: i,
                            entry_timestamp: bar.timestamp,
                            entry_price,
                            size: order.size,
                            stop_loss: order.stop_loss,
                            take_profit: order.take_profit,
                        });
                    }
                }
            }

            if i == last {
                for state in [&mut long, &mut short] {
                    if let SideState::Open(position) =
                        std::mem::replace(state, SideState::Flat)
                    {
                        let pnl = self.close_position(
                            &mut ledger,
                            position,
                            i,
                            bar,
                            close,
                            ExitReason::EndOfData,
                        )?;
                        equity = add_pnl(equity, pnl)?;
                    }
                }
            }

            trace!(bar = i, %equity, "Bar processed");
            ledger.record_equity(EquityPoint {
                timestamp: bar.timestamp,
                equity,
                long_size: long.size(),
                short_size: short.size(),
            });
        }

        info!(
            bars = bars.len(),
            trades = ledger.trades.len(),
            dropped_signals = ledger.dropped_signals,
            final_equity = %equity,
            "Simulation complete"
        );

        Ok(ledger)
    }

    /// Close `position` on bar `index` and record the trade. Returns its P&L.
    fn close_position(
        &self,
        ledger: &mut Ledger,
        position: Position,
        index: usize,
        bar: &Bar,
        close: Decimal,
        reason: ExitReason,
    ) -> EngineResult<Decimal> {
        let exit_price = self.config.exit_fill(position.side, close)?;
        let trade = position.close(
            index,
            bar.timestamp,
            exit_price,
            reason,
            self.config.fee_rate,
        )?;
        debug!(
            bar = index,
            side = %trade.side,
            price = %exit_price,
            reason = %reason,
            pnl = %trade.pnl,
            "Closed position"
        );
        let pnl = trade.pnl;
        ledger.add_trade(trade);
        Ok(pnl)
    }
}

fn add_pnl(equity: Decimal, pnl: Decimal) -> EngineResult<Decimal> {
    equity.checked_add(pnl).ok_or_else(|| {
        EngineError::InvalidParameter(format!("equity overflows adding P&L {}", pnl))
    })
}
