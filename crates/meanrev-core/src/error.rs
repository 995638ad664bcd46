//! Error types for the engine.

use rust_decimal::Decimal;
use thiserror::Error;

/// Fatal errors raised by the signal and simulation pipeline.
///
/// Degenerate per-bar conditions (a zero-distance stop) are not errors:
/// they are logged and the bar's action is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Insufficient data: need {required} usable bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Data alignment error: {0}")]
    DataAlignment(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl EngineError {
    /// Build an alignment error for two sequences of different length.
    pub fn length_mismatch(left: &str, left_len: usize, right: &str, right_len: usize) -> Self {
        EngineError::DataAlignment(format!(
            "{} has {} rows but {} has {}",
            left, left_len, right, right_len
        ))
    }

    /// Build an alignment error for a timestamp mismatch at a given row.
    pub fn timestamp_mismatch(index: usize, expected: i64, found: i64) -> Self {
        EngineError::DataAlignment(format!(
            "row {}: expected timestamp {}, found {}",
            index, expected, found
        ))
    }
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No data available: {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid bar at row {row}: {reason}")]
    InvalidBar { row: usize, reason: String },

    #[error("Timezone error: {0}")]
    Timezone(String),
}

/// Top-level error wrapping every failure of a run.
#[derive(Error, Debug)]
pub enum MeanRevError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Convert a price or rate to a `Decimal` for ledger arithmetic.
pub fn to_decimal(value: f64, what: &str) -> EngineResult<Decimal> {
    if !value.is_finite() {
        return Err(EngineError::InvalidParameter(format!(
            "{} must be finite, got {}",
            what, value
        )));
    }
    Decimal::try_from(value).map_err(|e| {
        EngineError::InvalidParameter(format!("{} ({}) is not representable: {}", what, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(1.5, "price").unwrap(), dec!(1.5));
        assert!(to_decimal(f64::NAN, "price").is_err());
        assert!(to_decimal(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::length_mismatch("bars", 3, "indicators", 2);
        assert_eq!(
            err.to_string(),
            "Data alignment error: bars has 3 rows but indicators has 2"
        );

        let err = EngineError::InsufficientData {
            required: 1,
            available: 0,
        };
        assert!(err.to_string().contains("need 1 usable bars"));
    }

    #[test]
    fn test_top_level_wrapping() {
        let err: MeanRevError = EngineError::InvalidParameter("risk".into()).into();
        assert_eq!(err.to_string(), "Invalid parameter: risk");

        let err: MeanRevError = DataError::NoDataAvailable("SPY".into()).into();
        assert!(matches!(err, MeanRevError::Data(_)));
    }
}
