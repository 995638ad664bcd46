//! End-to-end scenarios on hand-built series.

use meanrev_backtest::{SimulationConfig, TradeSimulator};
use meanrev_core::types::{Bar, ExitReason, IndicatorPoint, Position, Side};
use meanrev_risk::PositionSizer;
use meanrev_signals::SignalGenerator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const FIFTEEN_MINUTES: i64 = 900_000;

/// EMA 100, ATR 1, RSI 40 on every bar.
fn flat_indicators(bars: &[Bar]) -> Vec<IndicatorPoint> {
    bars.iter()
        .map(|b| IndicatorPoint::defined(b.timestamp, 100.0, 40.0, 1.0))
        .collect()
}

fn series(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
    rows.iter()
        .enumerate()
        .map(|(i, &(high, low, close))| {
            Bar::new(i as i64 * FIFTEEN_MINUTES, close, high, low, close)
        })
        .collect()
}

fn default_simulator() -> TradeSimulator {
    TradeSimulator::new(SimulationConfig::default(), PositionSizer::default()).unwrap()
}

#[test]
fn test_long_reverts_to_target() {
    // Only bar 2 reaches below EMA - 1.5 ATR = 98.5; bar 1's low is kept
    // above the band even though it closes at 98
    let bars = series(&[
        (100.5, 99.5, 100.0),
        (98.7, 98.6, 98.0),
        (97.5, 96.5, 97.0),
        (98.9, 98.6, 98.8),
        (101.5, 100.5, 101.0),
    ]);
    let records = SignalGenerator::default()
        .generate(&bars, &flat_indicators(&bars))
        .unwrap();
    assert_eq!(
        records.iter().filter(|r| r.long.entry).count(),
        1,
        "only bar 2 should trigger"
    );

    let ledger = default_simulator().run(&bars, &records).unwrap();

    assert_eq!(ledger.trades.len(), 1);
    let trade = &ledger.trades[0];
    assert_eq!(trade.side, Side::Long);
    assert_eq!(trade.entry_index, 2);
    assert_eq!(trade.entry_price, dec!(97) * dec!(1.00005));
    assert_eq!(trade.size, dec!(1));
    assert_eq!(trade.exit_index, 4);
    assert_eq!(trade.exit_price, dec!(101) * dec!(0.99995));
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert!(trade.gross_pnl > Decimal::ZERO);
    assert_eq!(ledger.final_equity(), dec!(100) + trade.pnl);
}

#[test]
fn test_close_on_target_exits_that_bar() {
    // Bar 3 closes at 99, exactly the target set at bar 2
    let bars = series(&[
        (100.5, 99.5, 100.0),
        (98.7, 98.6, 98.0),
        (97.5, 96.5, 97.0),
        (99.5, 98.7, 99.0),
        (101.5, 100.5, 101.0),
    ]);
    let records = SignalGenerator::default()
        .generate(&bars, &flat_indicators(&bars))
        .unwrap();
    let ledger = default_simulator().run(&bars, &records).unwrap();

    assert_eq!(ledger.trades.len(), 1);
    assert_eq!(ledger.trades[0].exit_index, 3);
    assert_eq!(ledger.trades[0].exit_reason, ExitReason::TakeProfit);
}

#[test]
fn test_fee_on_notional_of_both_fills() {
    let position = Position {
        side: Side::Long,
        entry_index: 0,
        entry_timestamp: 0,
        entry_price: dec!(100),
        size: dec!(1),
        stop_loss: 99.0,
        take_profit: 102.0,
    };
    let trade = position
        .close(1, FIFTEEN_MINUTES, dec!(102), ExitReason::TakeProfit, dec!(0.0001))
        .unwrap();

    assert_eq!(trade.gross_pnl, dec!(2));
    assert_eq!(trade.fees, dec!(0.0202));
    assert_eq!(trade.pnl, dec!(1.9798));
}

#[test]
fn test_stop_wins_when_both_levels_touched() {
    // Long from bar 1 (SL 96, TP 99); bar 2 wicks to 95.8 and closes at 99.2
    let bars = series(&[
        (100.5, 99.5, 100.0),
        (97.5, 96.5, 97.0),
        (99.5, 95.8, 99.2),
        (99.5, 99.0, 99.2),
    ]);
    let records = SignalGenerator::default()
        .generate(&bars, &flat_indicators(&bars))
        .unwrap();
    let ledger = default_simulator().run(&bars, &records).unwrap();

    let trade = ledger.trades_for(Side::Long).next().unwrap();
    assert_eq!(trade.exit_index, 2);
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
}

#[test]
fn test_short_side_round_trip() {
    // Bar 1 spikes above EMA + 1.5 ATR = 101.5; short at 101, TP 99, SL 102
    let bars = series(&[
        (100.5, 99.5, 100.0),
        (101.8, 100.8, 101.0),
        (100.2, 99.6, 100.0),
        (99.4, 98.6, 98.9),
    ]);
    let records = SignalGenerator::default()
        .generate(&bars, &flat_indicators(&bars))
        .unwrap();
    let ledger = default_simulator().run(&bars, &records).unwrap();

    assert_eq!(ledger.trades.len(), 1);
    let trade = &ledger.trades[0];
    assert_eq!(trade.side, Side::Short);
    assert_eq!(trade.entry_index, 1);
    assert_eq!(trade.exit_index, 3);
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert!(trade.pnl > Decimal::ZERO);
}

#[test]
fn test_short_stop_wins_when_both_levels_touched() {
    // Short at 101 (SL 102, TP 99); bar 2 wicks to 102.5 and closes at 98.9
    let bars = series(&[
        (100.5, 99.5, 100.0),
        (101.8, 100.8, 101.0),
        (102.5, 98.7, 98.9),
        (99.4, 99.0, 99.2),
    ]);
    let records = SignalGenerator::default()
        .generate(&bars, &flat_indicators(&bars))
        .unwrap();
    let ledger = default_simulator().run(&bars, &records).unwrap();

    assert_eq!(ledger.trades.len(), 1);
    let trade = &ledger.trades[0];
    assert_eq!(trade.side, Side::Short);
    assert_eq!(trade.exit_index, 2);
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
}
