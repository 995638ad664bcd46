//! Alignment checks and warm-up trimming.

use meanrev_core::error::{EngineError, EngineResult};
use meanrev_core::types::{Bar, IndicatorPoint};
use tracing::debug;

/// Fail unless `indicators` has exactly one point per bar with matching timestamps.
pub fn check_alignment(bars: &[Bar], indicators: &[IndicatorPoint]) -> EngineResult<()> {
    if bars.len() != indicators.len() {
        return Err(EngineError::length_mismatch(
            "bars",
            bars.len(),
            "indicators",
            indicators.len(),
        ));
    }
    for (i, (bar, point)) in bars.iter().zip(indicators).enumerate() {
        if bar.timestamp != point.timestamp {
            return Err(EngineError::timestamp_mismatch(i, bar.timestamp, point.timestamp));
        }
    }
    Ok(())
}

/// Drop every bar lacking a full set of indicator values.
///
/// Fails with `InsufficientData` when no usable bar remains.
pub fn trim_warmup(
    bars: &[Bar],
    indicators: &[IndicatorPoint],
) -> EngineResult<(Vec<Bar>, Vec<IndicatorPoint>)> {
    check_alignment(bars, indicators)?;

    let (kept_bars, kept_points): (Vec<Bar>, Vec<IndicatorPoint>) = bars
        .iter()
        .zip(indicators)
        .filter(|(_, point)| point.is_ready())
        .map(|(bar, point)| (*bar, *point))
        .unzip();

    if kept_bars.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    debug!(
        dropped = bars.len() - kept_bars.len(),
        kept = kept_bars.len(),
        "Trimmed warm-up bars"
    );

    Ok((kept_bars, kept_points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64) -> Bar {
        Bar::new(ts, 100.0, 101.0, 99.0, 100.0)
    }

    #[test]
    fn test_length_mismatch() {
        let bars = vec![bar(1), bar(2)];
        let points = vec![IndicatorPoint::defined(1, 100.0, 40.0, 1.0)];
        assert!(matches!(
            check_alignment(&bars, &points),
            Err(EngineError::DataAlignment(_))
        ));
    }

    #[test]
    fn test_timestamp_mismatch() {
        let bars = vec![bar(1), bar(2)];
        let points = vec![
            IndicatorPoint::defined(1, 100.0, 40.0, 1.0),
            IndicatorPoint::defined(3, 100.0, 40.0, 1.0),
        ];
        assert!(matches!(
            check_alignment(&bars, &points),
            Err(EngineError::DataAlignment(_))
        ));
    }

    #[test]
    fn test_trim_drops_undefined_rows() {
        let bars = vec![bar(1), bar(2), bar(3)];
        let points = vec![
            IndicatorPoint::new(1, None, None, None),
            IndicatorPoint::new(2, Some(100.0), None, Some(1.0)),
            IndicatorPoint::defined(3, 100.0, 40.0, 1.0),
        ];
        let (kept_bars, kept_points) = trim_warmup(&bars, &points).unwrap();
        assert_eq!(kept_bars, vec![bar(3)]);
        assert_eq!(kept_points.len(), 1);
        assert_eq!(kept_points[0].timestamp, 3);
    }

    #[test]
    fn test_trim_all_warmup_is_insufficient() {
        let bars = vec![bar(1)];
        let points = vec![IndicatorPoint::new(1, Some(100.0), Some(40.0), None)];
        assert_eq!(
            trim_warmup(&bars, &points),
            Err(EngineError::InsufficientData {
                required: 1,
                available: 0
            })
        );
    }
}
