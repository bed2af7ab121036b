use average::Mean;
use itertools::Itertools;

use crate::{
    core::{
        BLOCK_MINUTES,
        block_duration,
        error::AnalysisError,
        period::IntensityPeriod,
        window::Window,
    },
    prelude::*,
    quantity::intensity::Intensity,
};

/// Ordered sequence of forecast blocks.
///
/// Periods are strictly increasing, never overlap, and each spans exactly one block.
/// Gaps are allowed and split the series into contiguous spans, no window ever crosses a gap.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct TimeSeries(Vec<IntensityPeriod>);

impl TimeSeries {
    pub fn new(periods: Vec<IntensityPeriod>) -> Result<Self, AnalysisError> {
        if let Some(index) =
            periods.iter().position(|period| period.interval.duration() != block_duration())
        {
            return Err(AnalysisError::IrregularPeriod { index, block_minutes: BLOCK_MINUTES });
        }
        for (index, (previous, next)) in periods.iter().tuple_windows().enumerate() {
            let index = index + 1;
            if next.interval.start < previous.interval.end {
                return Err(AnalysisError::UnorderedSeries { index });
            }
            if next.interval.start > previous.interval.end {
                let gap = next.interval.start - previous.interval.end;
                warn!(index, ?gap, "gap in the forecast");
            }
        }
        Ok(Self(periods))
    }

    #[must_use]
    pub fn periods(&self) -> &[IntensityPeriod] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mean forecast intensity, [`None`] for an empty series.
    #[must_use]
    pub fn mean_intensity(&self) -> Option<Intensity> {
        let mean: Mean = self.0.iter().map(|period| period.forecast.0).collect();
        if mean.is_empty() { None } else { Some(Intensity(mean.mean())) }
    }

    /// Maximal runs of back-to-back periods, in time order.
    pub fn spans(&self) -> impl Iterator<Item = Window<'_>> {
        let mut start_index = 0;
        self.0.chunk_by(|previous, next| previous.interval.end == next.interval.start).filter_map(
            move |periods| {
                let span = Window::new(start_index, periods);
                start_index += periods.len();
                span
            },
        )
    }

    /// All windows of `n_blocks` back-to-back periods in time order.
    ///
    /// # Panics
    ///
    /// If `n_blocks` is zero.
    pub fn windows(&self, n_blocks: usize) -> impl Iterator<Item = Window<'_>> {
        self.spans().flat_map(move |span| {
            span.periods.windows(n_blocks).enumerate().filter_map(move |(offset, periods)| {
                Window::new(span.start_index + offset, periods)
            })
        })
    }
}

#[cfg(test)]
impl TimeSeries {
    /// Build a contiguous series of blocks starting at midnight of 2024-01-01 UTC.
    pub fn from_forecasts(forecasts: &[f64]) -> Self {
        Self::from_blocks(&(0_i32..).zip(forecasts.iter().copied()).collect_vec())
    }

    /// Build a series from `(block number since midnight of 2024-01-01 UTC, forecast)` pairs.
    pub fn from_blocks(blocks: &[(i32, f64)]) -> Self {
        use chrono::{TimeZone, Utc};

        use crate::core::interval::Interval;

        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let periods = blocks
            .iter()
            .map(|(block, forecast)| {
                let start = origin + block_duration() * *block;
                IntensityPeriod::builder()
                    .interval(Interval::new(start, start + block_duration()))
                    .forecast(Intensity(*forecast))
                    .build()
            })
            .collect();
        Self::new(periods).unwrap()
    }
}
