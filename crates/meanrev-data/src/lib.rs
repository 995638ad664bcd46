//! Bar data for the backtester: CSV loading with validation, and the
//! trading-session filter applied after indicator warm-up.

mod csv_source;
mod session;

pub use csv_source::CsvDataSource;
pub use session::SessionFilter;

use meanrev_core::error::DataError;
use meanrev_core::traits::DataSource;
use meanrev_core::types::{Bar, Timeframe};
use std::path::Path;

/// Load bars from a CSV file.
pub async fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<Vec<Bar>, DataError> {
    let source = CsvDataSource::new(path)?;
    source.load_bars(symbol, timeframe).await
}
