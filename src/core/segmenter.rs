use itertools::Itertools;

use crate::{core::series::TimeSeries, core::window::Window, quantity::intensity::Intensity};

/// Maximal span of back-to-back periods below the series mean.
pub type Run<'a> = Window<'a>;

/// Maximal span of back-to-back periods on the same side of the series mean.
///
/// A gap in the series always ends a segment.
#[derive(Copy, Clone, Debug)]
pub struct Segment<'a> {
    /// Strictly below the mean.
    pub is_low: bool,

    pub window: Window<'a>,
}

#[derive(Clone, Debug)]
#[must_use]
pub struct Segmentation<'a> {
    pub mean: Intensity,

    /// Low and non-low segments in time order, together covering the entire series.
    pub segments: Vec<Segment<'a>>,
}

impl<'a> Segmentation<'a> {
    /// Split the series into low-carbon and high-carbon segments.
    ///
    /// Returns [`None`] for an empty series since it has no mean.
    pub fn of(series: &'a TimeSeries) -> Option<Self> {
        let mean = series.mean_intensity()?;
        let mut segments = Vec::new();
        for span in series.spans() {
            let mut start_index = 0;
            for (is_low, chunk) in &span.periods.iter().chunk_by(|period| period.forecast < mean) {
                let end_index = start_index + chunk.count();
                let window = Window::new(
                    span.start_index + start_index,
                    &span.periods[start_index..end_index],
                );
                segments.extend(window.map(|window| Segment { is_low, window }));
                start_index = end_index;
            }
        }
        Some(Self { mean, segments })
    }

    pub fn low_carbon_runs(&self) -> impl Iterator<Item = Run<'a>> {
        self.segments.iter().filter(|segment| segment.is_low).map(|segment| segment.window)
    }
}

/// Low-carbon runs in time order, empty for an empty series.
#[must_use]
pub fn segment_low_carbon_runs(series: &TimeSeries) -> Vec<Run<'_>> {
    Segmentation::of(series)
        .map(|segmentation| segmentation.low_carbon_runs().collect())
        .unwrap_or_default()
}
