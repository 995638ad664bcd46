//! Configuration management.
//!
//! Settings come from a TOML file overlaid with `MEANREV__SECTION__KEY`
//! environment variables.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, DataSettings, LoggingConfig, SessionSettings,
    StrategySettings,
};

use config::{Config, ConfigError, Environment, File};
use meanrev_core::error::MeanRevError;
use std::path::Path;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("MEANREV")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Load configuration and check every value.
pub fn load_validated(path: &Path) -> Result<AppConfig, MeanRevError> {
    let config = load_config(path).map_err(|e| MeanRevError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
