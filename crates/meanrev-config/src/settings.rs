//! Configuration structures.

use meanrev_backtest::{Backtest, BacktestConfig, SimulationConfig};
use meanrev_core::error::{EngineError, MeanRevError};
use meanrev_core::types::{Timeframe, REGULAR_SESSION_MINUTES};
use meanrev_data::SessionFilter;
use meanrev_indicators::StandardIndicators;
use meanrev_signals::SignalConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub data: DataSettings,
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "meanrev".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Directory for a daily-rolling log file, in addition to stderr
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Indicator lengths and signal thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub ema_length: usize,
    pub rsi_length: usize,
    pub atr_length: usize,
    pub entry_atr_multiplier: f64,
    pub stop_atr_multiplier: f64,
    pub target_atr_multiplier: f64,
    pub rsi_threshold: f64,
}

impl Default for StrategySettings {
    fn default() -> Self {
        let indicators = StandardIndicators::default();
        let signals = SignalConfig::default();
        Self {
            ema_length: indicators.ema_length,
            rsi_length: indicators.rsi_length,
            atr_length: indicators.atr_length,
            entry_atr_multiplier: signals.entry_atr_multiplier,
            stop_atr_multiplier: signals.stop_atr_multiplier,
            target_atr_multiplier: signals.target_atr_multiplier,
            rsi_threshold: signals.rsi_threshold,
        }
    }
}

/// Capital, sizing and cost settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub initial_capital: Decimal,
    pub risk_amount: Decimal,
    pub fee_rate: Decimal,
    pub slippage: Decimal,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        let simulation = SimulationConfig::default();
        Self {
            initial_capital: simulation.initial_capital,
            risk_amount: BacktestConfig::default().risk_amount,
            fee_rate: simulation.fee_rate,
            slippage: simulation.slippage,
        }
    }
}

/// Trading-session window, applied after indicator warm-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub enabled: bool,
    /// IANA timezone name
    pub timezone: String,
    /// Local `HH:MM`, inclusive
    pub start: String,
    /// Local `HH:MM`, inclusive
    pub end: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: "America/Toronto".to_string(),
            start: "08:00".to_string(),
            end: "11:30".to_string(),
        }
    }
}

impl SessionSettings {
    /// The configured filter, or `None` when disabled.
    pub fn filter(&self) -> Result<Option<SessionFilter>, MeanRevError> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(Some(SessionFilter::parse(
            &self.timezone,
            &self.start,
            &self.end,
        )?))
    }
}

/// Input data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// CSV file of bars
    pub path: Option<PathBuf>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            symbol: "SPY".to_string(),
            timeframe: Timeframe::Minute15,
            path: None,
        }
    }
}

impl AppConfig {
    /// Pipeline configuration for a backtest run.
    ///
    /// With the session filter on, ratios are annualized over the session
    /// window instead of the regular trading day.
    pub fn backtest_config(&self) -> Result<BacktestConfig, MeanRevError> {
        let strategy = &self.strategy;
        let session_minutes = match self.session.filter()? {
            Some(filter) => {
                let minutes = (filter.end() - filter.start()).num_minutes();
                u32::try_from(minutes).unwrap_or(0).max(1)
            }
            None => REGULAR_SESSION_MINUTES,
        };

        Ok(BacktestConfig {
            indicators: StandardIndicators::new(
                strategy.ema_length,
                strategy.rsi_length,
                strategy.atr_length,
            )?,
            signals: SignalConfig {
                entry_atr_multiplier: strategy.entry_atr_multiplier,
                stop_atr_multiplier: strategy.stop_atr_multiplier,
                target_atr_multiplier: strategy.target_atr_multiplier,
                rsi_threshold: strategy.rsi_threshold,
            },
            simulation: SimulationConfig {
                initial_capital: self.backtest.initial_capital,
                fee_rate: self.backtest.fee_rate,
                slippage: self.backtest.slippage,
            },
            risk_amount: self.backtest.risk_amount,
            timeframe: self.data.timeframe,
            session_minutes,
        })
    }

    /// Check every section before any computation runs.
    pub fn validate(&self) -> Result<(), MeanRevError> {
        if self.backtest.initial_capital <= Decimal::ZERO {
            return Err(EngineError::InvalidParameter(format!(
                "initial_capital must be positive, got {}",
                self.backtest.initial_capital
            ))
            .into());
        }
        Backtest::new(self.backtest_config()?)?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, MeanRevError> {
        toml::to_string_pretty(self).map_err(|e| MeanRevError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_defaults_match_strategy_constants() {
        let config = AppConfig::default();
        assert_eq!(config.strategy.ema_length, 50);
        assert_eq!(config.strategy.rsi_threshold, 50.0);
        assert_eq!(config.backtest.initial_capital, dec!(100));
        assert_eq!(config.backtest.risk_amount, dec!(1));
        assert_eq!(config.backtest.fee_rate, dec!(0.0001));
        assert_eq!(config.backtest.slippage, dec!(0.00005));
        assert_eq!(config.session.timezone, "America/Toronto");
        assert_eq!(config.data.timeframe, Timeframe::Minute15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backtest_config_session_minutes() {
        let mut config = AppConfig::default();
        assert_eq!(config.backtest_config().unwrap().session_minutes, 210);

        config.session.enabled = false;
        assert_eq!(
            config.backtest_config().unwrap().session_minutes,
            REGULAR_SESSION_MINUTES
        );
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.strategy.atr_length = 0;
        assert!(matches!(
            config.validate(),
            Err(MeanRevError::Engine(EngineError::InvalidParameter(_)))
        ));

        let mut config = AppConfig::default();
        config.backtest.slippage = dec!(-0.01);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.backtest.initial_capital = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.timezone = "Nowhere/Land".into();
        assert!(matches!(config.validate(), Err(MeanRevError::Data(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[strategy]
ema_length = 20
entry_atr_multiplier = 2.0

[backtest]
risk_amount = 5

[session]
enabled = false

[data]
timeframe = "5m"
"#
        )
        .unwrap();

        let config = crate::load_validated(file.path()).unwrap();
        assert_eq!(config.strategy.ema_length, 20);
        assert_eq!(config.strategy.rsi_length, 14);
        assert_eq!(config.strategy.entry_atr_multiplier, 2.0);
        assert_eq!(config.backtest.risk_amount, dec!(5));
        assert!(!config.session.enabled);
        assert_eq!(config.data.timeframe, Timeframe::Minute5);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
