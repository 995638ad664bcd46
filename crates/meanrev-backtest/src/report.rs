//! Backtest report generation.

use meanrev_core::types::{Ledger, SignalRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BacktestConfig, BacktestStats};

/// Report rendering errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Complete backtest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Configuration used
    pub config: BacktestConfig,
    /// Statistics
    pub stats: BacktestStats,
    /// Trades and per-bar equity
    pub ledger: Ledger,
}

/// Flat CSV row for one side of a signal record.
#[derive(Serialize)]
struct SignalRow {
    timestamp: i64,
    close: f64,
    long_entry: bool,
    long_exit: bool,
    long_stop_loss: f64,
    long_take_profit: f64,
    short_entry: bool,
    short_exit: bool,
    short_stop_loss: f64,
    short_take_profit: f64,
}

impl From<&SignalRecord> for SignalRow {
    fn from(r: &SignalRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            close: r.close,
            long_entry: r.long.entry,
            long_exit: r.long.exit,
            long_stop_loss: r.long.stop_loss,
            long_take_profit: r.long.take_profit,
            short_entry: r.short.entry,
            short_exit: r.short.exit,
            short_stop_loss: r.short.stop_loss,
            short_take_profit: r.short.take_profit,
        }
    }
}

fn write_rows<T, I>(rows: I) -> Result<String, ReportError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Render signal records as CSV, one row per bar.
pub fn signals_to_csv(records: &[SignalRecord]) -> Result<String, ReportError> {
    write_rows(records.iter().map(SignalRow::from))
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Capital:     ${:.2}\n", stats.initial_capital));
        s.push_str(&format!("  Final Equity:        ${:.2}\n", stats.final_equity));
        s.push_str(&format!("  Net P&L:             ${:.4}\n", stats.total_pnl));
        s.push_str(&format!("  Total Return:        {:.2}%\n", stats.total_return_pct));
        s.push_str(&format!("  Max Drawdown:        {:.2}%\n", stats.max_drawdown_pct));
        s.push_str(&format!("  Total Fees:          ${:.4}\n", stats.total_fees));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Sharpe Ratio:        {:.2}\n", stats.sharpe_ratio));
        s.push_str(&format!("  Sortino Ratio:       {:.2}\n", stats.sortino_ratio));
        s.push_str(&format!("  Profit Factor:       {:.2}\n", stats.profit_factor));
        s.push_str(&format!("  Exposure:            {:.2}%\n", stats.exposure_pct));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Total Trades:        {} ({} long, {} short)\n",
            stats.total_trades, stats.long_trades, stats.short_trades
        ));
        s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
        s.push_str(&format!("  Breakeven Trades:    {}\n", stats.breakeven_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
        s.push_str(&format!("  Avg Win:             ${:.4}\n", stats.avg_win));
        s.push_str(&format!("  Avg Loss:            ${:.4}\n", stats.avg_loss));
        s.push_str(&format!("  Best Trade:          ${:.4}\n", stats.best_trade));
        s.push_str(&format!("  Worst Trade:         ${:.4}\n", stats.worst_trade));
        s.push_str(&format!("  Avg Bars Held:       {:.1}\n", stats.avg_bars_held));
        s.push('\n');

        s.push_str("EXITS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Stop Loss:           {}\n", stats.stop_loss_exits));
        s.push_str(&format!("  Take Profit:         {}\n", stats.take_profit_exits));
        s.push_str(&format!("  End of Data:         {}\n", stats.end_of_data_exits));
        s.push('\n');

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Bars Processed:      {}\n", stats.bars_processed));
        s.push_str(&format!("  Dropped Signals:     {}\n", stats.dropped_signals));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Export the equity curve to CSV.
    pub fn equity_to_csv(&self) -> Result<String, ReportError> {
        write_rows(&self.ledger.equity_curve)
    }

    /// Export the closed trades to CSV.
    pub fn trades_to_csv(&self) -> Result<String, ReportError> {
        write_rows(&self.ledger.trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meanrev_core::types::{EquityPoint, ExitReason, Side, SideSignal, Trade};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn report() -> BacktestReport {
        let mut ledger = Ledger::new(dec!(100));
        ledger.add_trade(Trade {
            side: Side::Long,
            entry_index: 2,
            entry_timestamp: 1_800_000,
            entry_price: dec!(97.00485),
            size: dec!(1),
            stop_loss: 96.0,
            take_profit: 99.0,
            exit_index: 4,
            exit_timestamp: 3_600_000,
            exit_price: dec!(100.99495),
            exit_reason: ExitReason::TakeProfit,
            gross_pnl: dec!(3.9901),
            fees: dec!(0.0198),
            pnl: dec!(3.9703),
        });
        for (ts, equity) in [(0, dec!(100)), (900_000, dec!(103.9703))] {
            ledger.record_equity(EquityPoint {
                timestamp: ts,
                equity,
                long_size: Decimal::ZERO,
                short_size: Decimal::ZERO,
            });
        }
        let stats = BacktestStats::from_ledger(&ledger, 252.0);
        BacktestReport {
            config: BacktestConfig::default(),
            stats,
            ledger,
        }
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("Total Return"));
        assert!(summary.contains("3.97%"));
        assert!(summary.contains("Take Profit:         1"));
    }

    #[test]
    fn test_trades_csv() {
        let csv = report().trades_to_csv().unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("side,entry_index,entry_timestamp"));
        assert!(header.contains("exit_reason"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("long,2,1800000,97.00485"));
        assert!(row.contains("take_profit"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_equity_csv() {
        let csv = report().equity_to_csv().unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("timestamp,equity,long_size,short_size"));
    }

    #[test]
    fn test_json_round_trip() {
        let original = report();
        let json = original.to_json().unwrap();
        let parsed: BacktestReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.ledger, original.ledger);
    }

    #[test]
    fn test_signals_csv() {
        let record = SignalRecord {
            timestamp: 5,
            close: 97.0,
            long: SideSignal {
                entry: true,
                exit: false,
                stop_loss: 96.0,
                take_profit: 99.0,
            },
            short: SideSignal::default(),
        };
        let csv = signals_to_csv(&[record]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,close,long_entry,long_exit,long_stop_loss,long_take_profit,\
             short_entry,short_exit,short_stop_loss,short_take_profit"
        );
        assert!(lines.next().unwrap().starts_with("5,97.0,true,false,96.0,99.0"));
    }
}
