//! Trading-session filter.

use chrono::{NaiveTime, TimeZone};
use chrono_tz::Tz;
use meanrev_core::error::DataError;
use meanrev_core::types::Bar;
use tracing::debug;

/// Keeps bars whose local wall-clock time lies within `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionFilter {
    timezone: Tz,
    start: NaiveTime,
    end: NaiveTime,
}

impl SessionFilter {
    /// Create a filter. `end` must not be before `start`.
    pub fn new(timezone: Tz, start: NaiveTime, end: NaiveTime) -> Result<Self, DataError> {
        if end < start {
            return Err(DataError::Parse(format!(
                "session end {} is before start {}",
                end, start
            )));
        }
        Ok(Self {
            timezone,
            start,
            end,
        })
    }

    /// Parse an IANA timezone name and `HH:MM` times.
    pub fn parse(timezone: &str, start: &str, end: &str) -> Result<Self, DataError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DataError::Timezone(format!("unknown timezone '{}'", timezone)))?;
        Self::new(tz, parse_time(start)?, parse_time(end)?)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether the bar's local time falls inside the session, bounds included.
    pub fn contains(&self, bar: &Bar) -> bool {
        match self.timezone.timestamp_millis_opt(bar.timestamp).single() {
            Some(local) => {
                let time = local.time();
                time >= self.start && time <= self.end
            }
            None => false,
        }
    }

    /// Filter a bar series.
    pub fn apply(&self, bars: &[Bar]) -> Result<Vec<Bar>, DataError> {
        let kept: Vec<Bar> = bars.iter().filter(|b| self.contains(b)).copied().collect();
        debug!(
            before = bars.len(),
            after = kept.len(),
            timezone = %self.timezone,
            "Applied session filter"
        );
        if kept.is_empty() {
            return Err(DataError::NoDataAvailable(
                "No data after time filtering".into(),
            ));
        }
        Ok(kept)
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, DataError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| DataError::Parse(format!("invalid session time '{}': {}", value, e)))
}
