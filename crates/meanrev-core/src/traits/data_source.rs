//! Data source trait definition.

use crate::error::DataError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;

/// Trait for historical bar sources.
///
/// Acquisition, timezone normalization and session filtering are the
/// source's concern; the engine only sees the returned bars.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load all bars for a symbol, ordered from oldest to newest.
    async fn load_bars(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
