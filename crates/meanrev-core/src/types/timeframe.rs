//! Bar interval definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Regular US equity session length in minutes (09:30-16:00).
pub const REGULAR_SESSION_MINUTES: u32 = 390;

/// Interval between consecutive bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    #[default]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Daily,
}

impl Timeframe {
    /// Bar duration in minutes.
    pub fn as_minutes(&self) -> u32 {
        match self {
            Timeframe::Minute1 => 1,
            Timeframe::Minute5 => 5,
            Timeframe::Minute15 => 15,
            Timeframe::Minute30 => 30,
            Timeframe::Hour1 => 60,
            Timeframe::Daily => 1440,
        }
    }

    /// Bar duration in milliseconds.
    pub fn as_millis(&self) -> i64 {
        i64::from(self.as_minutes()) * 60_000
    }

    pub fn is_intraday(&self) -> bool {
        !matches!(self, Timeframe::Daily)
    }

    /// Number of bars in a year when each trading day contributes
    /// `session_minutes` of data.
    pub fn periods_per_year(&self, session_minutes: u32) -> f64 {
        if !self.is_intraday() {
            return TRADING_DAYS_PER_YEAR;
        }
        let per_day = (f64::from(session_minutes) / f64::from(self.as_minutes())).floor();
        TRADING_DAYS_PER_YEAR * per_day.max(1.0)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Daily => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "30m" | "30min" => Ok(Timeframe::Minute30),
            "1h" | "60m" | "hour" => Ok(Timeframe::Hour1),
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}
