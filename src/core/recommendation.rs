use bon::bon;
use serde::Serialize;

use crate::{
    core::{
        classifier::{ApplianceProfile, ClusterId},
        features::FeatureVector,
        interval::Interval,
        segmenter::Run,
    },
    quantity::intensity::Intensity,
};

/// Minimal number of periods for the recommender to say anything.
pub const MIN_PERIODS: usize = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedWindow {
    #[serde(skip)]
    pub interval: Interval,

    /// Literal `from` of the first period of the run.
    pub start_time: String,

    /// Literal `to` of the last period of the run.
    pub end_time: String,

    pub duration_minutes: u32,

    pub average_intensity: Intensity,
}

/// Low-carbon run labelled with an appliance profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct Recommendation {
    pub appliance: ApplianceProfile,

    pub window: RecommendedWindow,

    pub cluster_id: ClusterId,

    #[serde(skip)]
    pub features: FeatureVector,
}

#[bon]
impl Recommendation {
    #[builder]
    pub fn assemble(
        run: Run<'_>,
        features: FeatureVector,
        cluster_id: ClusterId,
        profile: ApplianceProfile,
    ) -> Self {
        Self {
            appliance: profile,
            window: RecommendedWindow {
                interval: run.interval,
                start_time: run.start_time(),
                end_time: run.end_time(),
                duration_minutes: features.duration_minutes,
                average_intensity: run.average_intensity(),
            },
            cluster_id,
            features,
        }
    }
}

/// Outcome of a recommendation request that did not fail.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Recommendations {
    /// Too few periods to tell low from high intensity.
    InsufficientData { n_periods: usize },

    /// Recommendations in chronological order, possibly empty.
    Found(Vec<Recommendation>),
}

impl Recommendations {
    #[must_use]
    pub fn into_vec(self) -> Vec<Recommendation> {
        match self {
            Self::InsufficientData { .. } => Vec::new(),
            Self::Found(recommendations) => recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{segmenter::segment_low_carbon_runs, series::TimeSeries};

    fn profile() -> ApplianceProfile {
        ApplianceProfile {
            name: "Quick Green Burst".to_owned(),
            reason: "A short but significantly green window.".to_owned(),
            appliance: "Kettle / Toaster / Quick Charge".to_owned(),
            color: "#4FD1C5".to_owned(),
            icon: "FaLeaf".to_owned(),
        }
    }

    #[test]
    fn test_assemble_and_serialize() -> crate::prelude::Result {
        let series = TimeSeries::from_forecasts(&[100.0, 50.0, 300.0, 60.0, 40.0]);
        let run = segment_low_carbon_runs(&series)[1];
        let features = FeatureVector::extract(&run, series.mean_intensity().unwrap());
        let recommendation = Recommendation::assemble()
            .run(run)
            .features(features)
            .cluster_id(ClusterId(2))
            .profile(profile())
            .call();
        assert_eq!(
            serde_json::to_value(&recommendation)?,
            serde_json::json!({
                "appliance": {
                    "name": "Quick Green Burst",
                    "reason": "A short but significantly green window.",
                    "appliance": "Kettle / Toaster / Quick Charge",
                    "color": "#4FD1C5",
                    "icon": "FaLeaf",
                },
                "window": {
                    "startTime": "2024-01-01T01:30Z",
                    "endTime": "2024-01-01T02:30Z",
                    "durationMinutes": 60,
                    "averageIntensity": 50.0,
                },
                "cluster_id": 2,
            }),
        );
        Ok(())
    }

    #[test]
    fn test_insufficient_data_is_empty() {
        assert!(Recommendations::InsufficientData { n_periods: 1 }.into_vec().is_empty());
    }
}
