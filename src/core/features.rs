use average::Variance;

use crate::{core::segmenter::Run, quantity::intensity::Intensity};

/// Number of features the classifier works with.
pub const N_FEATURES: usize = 3;

/// Feature names in the order of [`FeatureVector::to_array`].
pub const FEATURE_NAMES: [&str; N_FEATURES] = ["duration", "depth", "stability"];

/// Shape of a low-carbon run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[must_use]
pub struct FeatureVector {
    pub duration_minutes: u32,

    /// Relative improvement of the run average over the series mean.
    pub depth: f64,

    /// Population standard deviation of the run intensities.
    pub stability: f64,
}

impl FeatureVector {
    pub fn extract(run: &Run<'_>, series_mean: Intensity) -> Self {
        let variance: Variance = run.intensities().map(|intensity| intensity.0).collect();
        let run_average = variance.mean();
        let depth = if series_mean > Intensity::ZERO {
            (series_mean.0 - run_average) / series_mean.0
        } else {
            0.0
        };
        let stability = if run.len() == 1 { 0.0 } else { variance.population_variance().sqrt() };
        Self { duration_minutes: run.duration_minutes(), depth, stability }
    }

    #[must_use]
    pub fn to_array(self) -> [f64; N_FEATURES] {
        [f64::from(self.duration_minutes), self.depth, self.stability]
    }

    /// Non-finite vectors must not reach the classifier.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}
