//! Backtesting: trade simulation, statistics and reporting.
//!
//! [`TradeSimulator`] is a per-side Flat/Open state machine over an
//! already-aligned series of bars and signals. [`Backtest`] wires the
//! indicator provider, signal generator, sizer and simulator together
//! and hands the resulting [`Ledger`](meanrev_core::Ledger) to
//! [`BacktestStats`].

mod engine;
mod report;
mod simulator;
mod statistics;
mod sweep;

pub use engine::{Backtest, BacktestConfig};
pub use report::{signals_to_csv, BacktestReport, ReportError};
pub use simulator::{SimulationConfig, TradeSimulator};
pub use statistics::BacktestStats;
pub use sweep::{run_sweep, ParameterGrid, SweepError, SweepParams, SweepResult};
