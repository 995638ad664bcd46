//! Summary statistics over a simulation ledger.

use meanrev_core::types::{ExitReason, Ledger, Side};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Aggregate performance metrics of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Initial capital
    pub initial_capital: Decimal,
    /// Final equity
    pub final_equity: Decimal,
    /// Net realized P&L
    pub total_pnl: Decimal,
    /// Total return percentage
    pub total_return_pct: Decimal,
    /// Maximum peak-to-trough drawdown of the equity curve, percent
    pub max_drawdown_pct: Decimal,
    /// Annualized Sharpe ratio of per-bar equity returns (risk-free rate 0)
    pub sharpe_ratio: f64,
    /// Annualized Sortino ratio of per-bar equity returns
    pub sortino_ratio: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    pub long_trades: usize,
    pub short_trades: usize,
    pub win_rate_pct: Decimal,
    /// Average profit per winning trade
    pub avg_win: Decimal,
    /// Average loss per losing trade (positive number)
    pub avg_loss: Decimal,
    /// Gross profit / gross loss; zero when there is no loss
    pub profit_factor: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,
    pub total_fees: Decimal,
    pub stop_loss_exits: usize,
    pub take_profit_exits: usize,
    /// Positions force-closed on the final bar; not strategy exits
    pub end_of_data_exits: usize,
    pub avg_bars_held: f64,
    /// Share of bars ending with an open position, percent
    pub exposure_pct: f64,
    /// Entry signals dropped for a zero stop distance
    pub dropped_signals: usize,
    /// Number of bars simulated
    pub bars_processed: usize,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

impl BacktestStats {
    /// Compute statistics from a ledger.
    ///
    /// `periods_per_year` annualizes the per-bar return ratios.
    pub fn from_ledger(ledger: &Ledger, periods_per_year: f64) -> Self {
        let initial_capital = ledger.initial_capital;
        let final_equity = ledger.final_equity();
        let total_pnl = ledger.realized_pnl();

        let total_return_pct = if initial_capital > Decimal::ZERO {
            (final_equity - initial_capital) / initial_capital * dec!(100)
        } else {
            Decimal::ZERO
        };

        // Drawdown from the running peak, starting at initial capital
        let mut peak = initial_capital;
        let mut max_drawdown_pct = Decimal::ZERO;
        for point in &ledger.equity_curve {
            if point.equity > peak {
                peak = point.equity;
            }
            if peak > Decimal::ZERO {
                let drawdown = (peak - point.equity) / peak * dec!(100);
                if drawdown > max_drawdown_pct {
                    max_drawdown_pct = drawdown;
                }
            }
        }

        let mut returns = Vec::with_capacity(ledger.equity_curve.len());
        let mut prev = initial_capital;
        for point in &ledger.equity_curve {
            if prev > Decimal::ZERO {
                returns.push(to_f64((point.equity - prev) / prev));
            }
            prev = point.equity;
        }
        let (sharpe_ratio, sortino_ratio) = ratios(&returns, periods_per_year);

        let mut winning_trades = 0;
        let mut losing_trades = 0;
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        for trade in &ledger.trades {
            if trade.is_win() {
                winning_trades += 1;
                gross_profit += trade.pnl;
            } else if trade.is_loss() {
                losing_trades += 1;
                gross_loss += trade.pnl.abs();
            }
        }
        let total_trades = ledger.trades.len();

        let win_rate_pct = if total_trades > 0 {
            Decimal::from(winning_trades * 100) / Decimal::from(total_trades)
        } else {
            Decimal::ZERO
        };
        let avg_win = if winning_trades > 0 {
            gross_profit / Decimal::from(winning_trades)
        } else {
            Decimal::ZERO
        };
        let avg_loss = if losing_trades > 0 {
            gross_loss / Decimal::from(losing_trades)
        } else {
            Decimal::ZERO
        };
        let profit_factor = if gross_loss > Decimal::ZERO {
            gross_profit / gross_loss
        } else {
            Decimal::ZERO
        };

        let avg_bars_held = if total_trades > 0 {
            ledger.trades.iter().map(|t| t.bars_held() as f64).sum::<f64>() / total_trades as f64
        } else {
            0.0
        };

        let bars_processed = ledger.equity_curve.len();
        let exposure_pct = if bars_processed > 0 {
            let exposed = ledger
                .equity_curve
                .iter()
                .filter(|p| p.has_exposure())
                .count();
            exposed as f64 * 100.0 / bars_processed as f64
        } else {
            0.0
        };

        Self {
            initial_capital,
            final_equity,
            total_pnl,
            total_return_pct,
            max_drawdown_pct,
            sharpe_ratio,
            sortino_ratio,
            total_trades,
            winning_trades,
            losing_trades,
            breakeven_trades: total_trades - winning_trades - losing_trades,
            long_trades: ledger.trades_for(Side::Long).count(),
            short_trades: ledger.trades_for(Side::Short).count(),
            win_rate_pct,
            avg_win,
            avg_loss,
            profit_factor,
            best_trade: ledger
                .trades
                .iter()
                .map(|t| t.pnl)
                .max()
                .unwrap_or(Decimal::ZERO),
            worst_trade: ledger
                .trades
                .iter()
                .map(|t| t.pnl)
                .min()
                .unwrap_or(Decimal::ZERO),
            total_fees: ledger.trades.iter().map(|t| t.fees).sum(),
            stop_loss_exits: ledger.count_by_reason(ExitReason::StopLoss),
            take_profit_exits: ledger.count_by_reason(ExitReason::TakeProfit),
            end_of_data_exits: ledger.count_by_reason(ExitReason::EndOfData),
            avg_bars_held,
            exposure_pct,
            dropped_signals: ledger.dropped_signals,
            bars_processed,
        }
    }
}

/// Annualized Sharpe and Sortino ratios; zero when undefined.
fn ratios(returns: &[f64], periods_per_year: f64) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let annualization = periods_per_year.max(0.0).sqrt();

    let sharpe = if std_dev > 0.0 {
        mean / std_dev * annualization
    } else {
        0.0
    };

    // Downside deviation over all periods, positive returns counted as zero
    let downside_variance = returns.iter().map(|r| r.min(0.0).powi(2)).sum::<f64>() / n;
    let downside_dev = downside_variance.sqrt();
    let sortino = if downside_dev > 0.0 {
        mean / downside_dev * annualization
    } else {
        0.0
    };

    (sharpe, sortino)
}
