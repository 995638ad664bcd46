//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use meanrev_core::error::DataError;
use meanrev_core::traits::DataSource;
use meanrev_core::types::{Bar, Timeframe};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CSV record format. Volume and extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "Datetime",
        alias = "datetime",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
}

/// Historical bars from a CSV file.
///
/// Rows are sorted by timestamp, then checked: every price positive and
/// finite, timestamps unique.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a CSV data source. Fails if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, sort and validate every row.
    fn read(&self) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        // (source row, bar); rows are 1-based and exclude the header
        let mut rows = Vec::new();
        for (i, result) in reader.deserialize().enumerate() {
            let row = i + 1;
            let record: CsvRecord =
                result.map_err(|e| DataError::Parse(format!("row {}: {}", row, e)))?;
            let bar = Bar::new(
                parse_timestamp(&record.date)?,
                record.open,
                record.high,
                record.low,
                record.close,
            );
            bar.validate()
                .map_err(|reason| DataError::InvalidBar { row, reason })?;
            rows.push((row, bar));
        }

        if rows.is_empty() {
            return Err(DataError::NoDataAvailable(format!(
                "{} has no rows",
                self.path.display()
            )));
        }

        rows.sort_by_key(|(_, bar)| bar.timestamp);
        for pair in rows.windows(2) {
            let (_, prev) = pair[0];
            let (row, bar) = pair[1];
            if bar.timestamp == prev.timestamp {
                return Err(DataError::InvalidBar {
                    row,
                    reason: format!("duplicate timestamp {}", bar.timestamp),
                });
            }
        }

        Ok(rows.into_iter().map(|(_, bar)| bar).collect())
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn load_bars(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        let bars = self.read()?;
        info!(
            symbol,
            %timeframe,
            bars = bars.len(),
            path = %self.path.display(),
            "Loaded bars"
        );
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse a timestamp into Unix milliseconds (UTC).
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS±HH:MM` with an offset, naive
/// date-times and dates (taken as UTC), and Unix seconds or milliseconds.
pub(crate) fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Ok(dt.timestamp_millis());
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts.checked_mul(1000).ok_or_else(|| {
            DataError::Parse(format!("Timestamp out of range: {}", date_str))
        });
    }

    debug!(value = date_str, "Unrecognized timestamp");
    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}
