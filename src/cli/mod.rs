//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use meanrev_config::AppConfig;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meanrev")]
#[command(author, version, about = "ATR/RSI mean-reversion backtester")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "MEANREV_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write JSON logs to a daily file in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtest over a CSV of bars
    Backtest(BacktestArgs),
    /// Write per-bar signal records as CSV
    Signals(SignalsArgs),
    /// Backtest every combination of a parameter grid
    Sweep(SweepArgs),
    /// Validate configuration and print the effective values
    ValidateConfig,
}

/// Flags that override configuration file values.
#[derive(clap::Args, Clone, Default)]
pub struct Overrides {
    /// Data file (CSV)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Symbol label for logs and reports
    #[arg(long)]
    pub symbol: Option<String>,

    /// Initial capital
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Loss per trade when the stop is hit
    #[arg(long)]
    pub risk: Option<Decimal>,

    /// Fee rate on fill notional
    #[arg(long)]
    pub fee_rate: Option<Decimal>,

    /// Slippage rate
    #[arg(long)]
    pub slippage: Option<Decimal>,

    /// EMA length
    #[arg(long)]
    pub ema_length: Option<usize>,

    /// RSI length
    #[arg(long)]
    pub rsi_length: Option<usize>,

    /// ATR length
    #[arg(long)]
    pub atr_length: Option<usize>,

    /// Disable the trading-session filter
    #[arg(long)]
    pub no_session: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.data {
            config.data.path = Some(path.clone());
        }
        if let Some(symbol) = &self.symbol {
            config.data.symbol = symbol.clone();
        }
        if let Some(capital) = self.capital {
            config.backtest.initial_capital = capital;
        }
        if let Some(risk) = self.risk {
            config.backtest.risk_amount = risk;
        }
        if let Some(fee_rate) = self.fee_rate {
            config.backtest.fee_rate = fee_rate;
        }
        if let Some(slippage) = self.slippage {
            config.backtest.slippage = slippage;
        }
        if let Some(length) = self.ema_length {
            config.strategy.ema_length = length;
        }
        if let Some(length) = self.rsi_length {
            config.strategy.rsi_length = length;
        }
        if let Some(length) = self.atr_length {
            config.strategy.atr_length = length;
        }
        if self.no_session {
            config.session.enabled = false;
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write closed trades as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,

    /// Write the per-bar equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// EMA lengths to try (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub ema_lengths: Vec<usize>,

    /// Entry ATR multipliers to try (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub entry_multipliers: Vec<f64>,

    /// RSI entry thresholds to try (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub rsi_thresholds: Vec<f64>,

    /// Rows to print
    #[arg(long, default_value = "20")]
    pub top: usize,
}
