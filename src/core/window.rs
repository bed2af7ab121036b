use std::ops::Range;

use average::Mean;

use crate::{
    core::{BLOCK_MINUTES, interval::Interval, period::IntensityPeriod},
    ingest::timestamp,
    quantity::intensity::Intensity,
};

/// Contiguous non-empty span of periods within a [`TimeSeries`].
///
/// [`TimeSeries`]: crate::core::series::TimeSeries
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct Window<'a> {
    /// Index of the first period in the parent series.
    pub start_index: usize,

    pub periods: &'a [IntensityPeriod],

    pub interval: Interval,
}

impl<'a> Window<'a> {
    /// Returns [`None`] for an empty slice.
    pub fn new(start_index: usize, periods: &'a [IntensityPeriod]) -> Option<Self> {
        let interval = Interval::new(periods.first()?.interval.start, periods.last()?.interval.end);
        Some(Self { start_index, periods, interval })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.periods.len()
    }

    #[must_use]
    pub const fn index_range(&self) -> Range<usize> {
        self.start_index..(self.start_index + self.periods.len())
    }

    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn duration_minutes(&self) -> u32 {
        self.periods.len() as u32 * BLOCK_MINUTES
    }

    /// Start exactly as the upstream rendered it, or in the API format for synthetic periods.
    #[must_use]
    pub fn start_time(self) -> String {
        self.periods
            .first()
            .and_then(|period| period.raw_bounds.as_ref())
            .map_or_else(|| timestamp::render(self.interval.start), |bounds| bounds.from.clone())
    }

    #[must_use]
    pub fn end_time(self) -> String {
        self.periods
            .last()
            .and_then(|period| period.raw_bounds.as_ref())
            .map_or_else(|| timestamp::render(self.interval.end), |bounds| bounds.to.clone())
    }

    pub fn intensities(self) -> impl Iterator<Item = Intensity> + 'a {
        self.periods.iter().map(|period| period.forecast)
    }

    pub fn total_intensity(self) -> Intensity {
        self.intensities().sum()
    }

    pub fn average_intensity(self) -> Intensity {
        let mean: Mean = self.intensities().map(|intensity| intensity.0).collect();
        Intensity(mean.mean())
    }
}
