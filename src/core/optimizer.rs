use chrono::TimeDelta;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::{
    core::{block_count, error::AnalysisError, interval::Interval, series::TimeSeries},
    prelude::*,
    quantity::{energy::KilowattHours, intensity::Intensity, mass::Grams, power::Kilowatts},
};

/// The lowest-carbon slot for a task, along with the savings against the worst slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct BestWindow {
    #[serde(skip)]
    pub interval: Interval,

    /// Literal `from` of the first period.
    pub start_time: String,

    /// Literal `to` of the last period.
    pub end_time: String,

    #[serde(rename = "saved_grams_co2")]
    pub saved_grams: u64,

    #[serde(skip)]
    pub details: WindowDetails,
}

/// Intermediate values behind [`BestWindow`], for reporting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WindowDetails {
    pub n_blocks: usize,
    pub best_start_index: usize,
    pub best_average: Intensity,
    pub worst_interval: Interval,
    pub worst_average: Intensity,
    pub energy: KilowattHours,
}

/// Find the window of back-to-back blocks with the smallest total forecast intensity.
///
/// The earliest window wins among equal totals. The savings estimate compares the best window
/// against the worst one (the latest among equal totals) for a task drawing `power`
/// over `duration_minutes`. Windows never span a gap in the series.
#[instrument(skip(series), fields(n_periods = series.len()))]
pub fn find_best_window(
    series: &TimeSeries,
    duration_minutes: u32,
    power: Kilowatts,
) -> Result<BestWindow, AnalysisError> {
    if duration_minutes == 0 {
        return Err(AnalysisError::InvalidArgument("duration must be positive"));
    }
    if !power.is_finite() || power <= Kilowatts::ZERO {
        return Err(AnalysisError::InvalidArgument("power must be positive"));
    }
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let n_blocks = block_count(duration_minutes);
    let windows = series.windows(n_blocks).collect_vec();
    let (best, worst) =
        match windows.iter().position_minmax_by_key(|window| window.total_intensity()) {
            MinMaxResult::NoElements => {
                let n_periods = series.spans().map(|span| span.len()).max().unwrap_or_default();
                return Err(AnalysisError::DurationTooLong { n_blocks, n_periods });
            }
            MinMaxResult::OneElement(index) => (windows[index], windows[index]),
            MinMaxResult::MinMax(best_index, worst_index) => {
                (windows[best_index], windows[worst_index])
            }
        };

    #[expect(clippy::cast_precision_loss)]
    let divisor = n_blocks as f64;
    let best_average = best.total_intensity() / divisor;
    let worst_average = worst.total_intensity() / divisor;
    let energy = power * TimeDelta::minutes(i64::from(duration_minutes));
    let saved = (worst_average - best_average) * energy;
    debug!(
        best = ?best.interval,
        worst = ?worst.interval,
        ?best_average,
        ?worst_average,
        ?saved,
        "evaluated windows",
    );

    Ok(BestWindow {
        interval: best.interval,
        start_time: best.start_time(),
        end_time: best.end_time(),
        saved_grams: round_grams(saved),
        details: WindowDetails {
            n_blocks,
            best_start_index: best.start_index,
            best_average,
            worst_interval: worst.interval,
            worst_average,
            energy,
        },
    })
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_grams(grams: Grams) -> u64 {
    grams.0.round_ties_even().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{core::window::Window, ingest::parse_forecast};

    #[test]
    fn test_best_window() -> Result {
        let series = TimeSeries::from_forecasts(&[200.0, 100.0, 50.0, 300.0]);
        let best = find_best_window(&series, 60, Kilowatts(2.0))?;
        assert_eq!(best.interval.start, series.periods()[1].interval.start);
        assert_eq!(best.interval.end, series.periods()[2].interval.end);
        assert_eq!(best.saved_grams, 200);
        assert_eq!(best.details.n_blocks, 2);
        assert_abs_diff_eq!(best.details.best_average.0, 75.0);
        assert_abs_diff_eq!(best.details.worst_average.0, 175.0);
        Ok(())
    }

    #[test]
    fn test_single_window() -> Result {
        let series = TimeSeries::from_forecasts(&[200.0, 100.0, 50.0, 300.0]);
        let best = find_best_window(&series, 120, Kilowatts(1.0))?;
        assert_eq!(best.interval, Interval::new(
            series.periods()[0].interval.start,
            series.periods()[3].interval.end,
        ));
        assert_eq!(best.saved_grams, 0);
        Ok(())
    }

    #[test]
    fn test_duration_too_long() {
        let series = TimeSeries::from_forecasts(&[200.0, 100.0, 50.0, 300.0]);
        assert_eq!(
            find_best_window(&series, 121, Kilowatts(1.0)),
            Err(AnalysisError::DurationTooLong { n_blocks: 5, n_periods: 4 }),
        );
    }

    #[test]
    fn test_partial_block_rounds_up() -> Result {
        let series = TimeSeries::from_forecasts(&[10.0, 20.0, 30.0]);
        let best = find_best_window(&series, 31, Kilowatts(1.0))?;
        assert_eq!(best.details.n_blocks, 2);
        Ok(())
    }

    #[test]
    fn test_earliest_minimum_wins() -> Result {
        let series = TimeSeries::from_forecasts(&[100.0, 50.0, 100.0, 50.0]);
        let best = find_best_window(&series, 30, Kilowatts(1.0))?;
        assert_eq!(best.details.best_start_index, 1);
        Ok(())
    }

    #[test]
    fn test_latest_maximum_is_worst() -> Result {
        let series = TimeSeries::from_forecasts(&[300.0, 50.0, 300.0, 100.0]);
        let best = find_best_window(&series, 30, Kilowatts(1.0))?;
        assert_eq!(best.details.worst_interval, series.periods()[2].interval);
        assert_eq!(best.saved_grams, 125);
        Ok(())
    }

    #[test]
    fn test_windows_do_not_span_gaps() -> Result {
        // 00:00, 00:30, then 01:30 and 02:00 after a missing block.
        let series = TimeSeries::from_blocks(&[(0, 100.0), (1, 10.0), (3, 10.0), (4, 100.0)]);
        let best = find_best_window(&series, 60, Kilowatts(1.0))?;
        assert_eq!(best.interval.duration(), TimeDelta::minutes(60));
        assert_eq!(best.details.best_start_index, 0);
        assert_eq!(best.details.worst_interval.duration(), TimeDelta::minutes(60));

        assert_eq!(
            find_best_window(&series, 90, Kilowatts(1.0)),
            Err(AnalysisError::DurationTooLong { n_blocks: 3, n_periods: 2 }),
        );
        Ok(())
    }

    #[test]
    fn test_invalid_arguments() {
        let series = TimeSeries::from_forecasts(&[100.0]);
        assert!(matches!(
            find_best_window(&series, 0, Kilowatts(1.0)),
            Err(AnalysisError::InvalidArgument(_)),
        ));
        assert!(matches!(
            find_best_window(&series, 30, Kilowatts(0.0)),
            Err(AnalysisError::InvalidArgument(_)),
        ));
        assert!(matches!(
            find_best_window(&series, 30, Kilowatts(f64::NAN)),
            Err(AnalysisError::InvalidArgument(_)),
        ));
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(
            find_best_window(&TimeSeries::default(), 30, Kilowatts(1.0)),
            Err(AnalysisError::EmptySeries),
        );
    }

    #[test]
    fn test_serialize() -> Result {
        let series = TimeSeries::from_forecasts(&[200.0, 100.0, 50.0, 300.0]);
        let best = find_best_window(&series, 60, Kilowatts(2.0))?;
        assert_eq!(
            serde_json::to_value(&best)?,
            serde_json::json!({
                "start_time": "2024-01-01T00:30Z",
                "end_time": "2024-01-01T01:30Z",
                "saved_grams_co2": 200,
            }),
        );
        Ok(())
    }

    #[test]
    fn test_serialize_keeps_upstream_timestamps() -> Result {
        let json = serde_json::json!([
            {
                "from": "2024-01-01T00:00:00Z",
                "to": "2024-01-01T00:30:00Z",
                "intensity": { "forecast": 200 },
            },
            {
                "from": "2024-01-01T00:30:00Z",
                "to": "2024-01-01T01:00:00Z",
                "intensity": { "forecast": 100 },
            },
        ]);
        let series = parse_forecast(&json.to_string(), None)?;
        let best = find_best_window(&series, 30, Kilowatts(1.0))?;
        assert_eq!(best.start_time, "2024-01-01T00:30:00Z");
        assert_eq!(best.end_time, "2024-01-01T01:00:00Z");
        assert_eq!(serde_json::to_value(&best)?["start_time"], "2024-01-01T00:30:00Z");
        Ok(())
    }

    proptest! {
        #[test]
        fn best_window_is_minimal(
            forecasts in prop::collection::vec(0.0_f64..500.0, 1..48),
            duration in 1_u32..=240,
            power in 0.1_f64..10.0,
        ) {
            let series = TimeSeries::from_forecasts(&forecasts);
            match find_best_window(&series, duration, Kilowatts(power)) {
                Ok(best) => {
                    let n_blocks = block_count(duration);
                    let best_total = series
                        .windows(n_blocks)
                        .nth(best.details.best_start_index)
                        .unwrap()
                        .total_intensity();
                    let totals =
                        series.windows(n_blocks).map(Window::total_intensity).collect_vec();
                    let min_total = totals.iter().copied().min().unwrap();
                    let max_total = totals.iter().copied().max().unwrap();
                    prop_assert_eq!(best_total, min_total);
                    prop_assert!(best.details.worst_average >= best.details.best_average);

                    let divisor = f64::from(u32::try_from(n_blocks).unwrap());
                    let energy = Kilowatts(power) * TimeDelta::minutes(i64::from(duration));
                    let saved = (max_total / divisor - min_total / divisor) * energy;
                    prop_assert!(saved.0 >= 0.0);
                    prop_assert_eq!(best.saved_grams, round_grams(saved));
                }
                Err(error) => {
                    prop_assert_eq!(error, AnalysisError::DurationTooLong {
                        n_blocks: block_count(duration),
                        n_periods: forecasts.len(),
                    });
                }
            }
        }
    }
}
