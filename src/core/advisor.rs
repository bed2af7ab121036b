use std::{path::Path, sync::Arc};

use itertools::Itertools;

use crate::{
    core::{
        classifier::Classifier,
        error::AnalysisError,
        features::FeatureVector,
        optimizer::{BestWindow, find_best_window},
        recommendation::{MIN_PERIODS, Recommendation, Recommendations},
        segmenter::segment_low_carbon_runs,
        series::TimeSeries,
    },
    prelude::*,
    quantity::power::Kilowatts,
};

/// Read-only analysis context shared by all requests.
///
/// The classifier is loaded once and never mutated, a model update means building a new advisor.
/// Without a classifier, the recommender fails closed while the optimizer keeps working.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Advisor {
    classifier: Option<Arc<Classifier>>,
}

impl Advisor {
    pub fn new(classifier: Option<Classifier>) -> Self {
        Self { classifier: classifier.map(Arc::new) }
    }

    pub fn with_model_file(path: &Path) -> Self {
        match Classifier::from_file(path) {
            Ok(classifier) => Self::new(Some(classifier)),
            Err(error) => {
                error!("the recommender is disabled: {error:#}");
                Self::default()
            }
        }
    }

    pub fn classifier(&self) -> Result<&Classifier, AnalysisError> {
        self.classifier.as_deref().ok_or(AnalysisError::ArtifactUnavailable)
    }

    pub fn best_window(
        &self,
        series: &TimeSeries,
        duration_minutes: u32,
        power: Kilowatts,
    ) -> Result<BestWindow, AnalysisError> {
        find_best_window(series, duration_minutes, power)
    }

    /// Classify every low-carbon run of the series and label it with its appliance profile.
    #[instrument(skip_all, fields(n_periods = series.len()))]
    pub fn recommend(&self, series: &TimeSeries) -> Result<Recommendations, AnalysisError> {
        let classifier = self.classifier()?;

        if series.len() < MIN_PERIODS {
            info!("not enough data to recommend anything");
            return Ok(Recommendations::InsufficientData { n_periods: series.len() });
        }
        let Some(mean) = series.mean_intensity() else {
            return Ok(Recommendations::InsufficientData { n_periods: series.len() });
        };
        let runs = segment_low_carbon_runs(series);
        debug!(%mean, n_runs = runs.len(), "segmented");

        let mut recommendations = runs
            .into_iter()
            .filter_map(|run| {
                let features = FeatureVector::extract(&run, mean);
                if !features.is_finite() {
                    warn!(
                        interval = ?run.interval,
                        ?features,
                        "non-finite features, skipping the run",
                    );
                    return None;
                }
                let assignment = classifier.nearest(features);
                let Some(profile) = classifier.profile(assignment.cluster_id) else {
                    warn!(
                        cluster_id = %assignment.cluster_id,
                        "no profile for the cluster, skipping the run",
                    );
                    return None;
                };
                debug!(
                    interval = ?run.interval,
                    ?features,
                    cluster_id = %assignment.cluster_id,
                    distance = assignment.distance,
                    profile = %profile.name,
                    "classified",
                );
                Some(
                    Recommendation::assemble()
                        .run(run)
                        .features(features)
                        .cluster_id(assignment.cluster_id)
                        .profile(profile.clone())
                        .call(),
                )
            })
            .collect_vec();
        recommendations.sort_by_key(|recommendation| recommendation.window.interval.start);

        info!(n_recommendations = recommendations.len(), "done");
        Ok(Recommendations::Found(recommendations))
    }
}
