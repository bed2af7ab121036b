use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::features::{FEATURE_NAMES, FeatureVector, N_FEATURES},
    prelude::*,
};

/// Supported version of [`ClassifierArtifact`].
pub const SCHEMA_VERSION: u32 = 1;

#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

/// Static description of what a cluster is good for.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApplianceProfile {
    pub name: String,
    pub reason: String,
    pub appliance: String,
    pub color: String,
    pub icon: String,
}

/// Persisted, language-neutral form of a fitted nearest-centroid model.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClassifierArtifact {
    pub schema_version: u32,

    /// Feature names in the column order of the scaler and the centroids.
    pub features: Vec<String>,

    pub scaler: Scaler,

    /// Centroids in the standardized feature space.
    pub centroids: Vec<[f64; N_FEATURES]>,

    pub profiles: BTreeMap<ClusterId, ApplianceProfile>,
}

/// Z-score standardization parameters.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Scaler {
    pub mean: [f64; N_FEATURES],
    pub std: [f64; N_FEATURES],
}

impl Scaler {
    #[must_use]
    pub fn transform(&self, features: [f64; N_FEATURES]) -> [f64; N_FEATURES] {
        let mut standardized = features;
        for ((value, mean), std) in standardized.iter_mut().zip(self.mean).zip(self.std) {
            *value = (*value - mean) / std;
        }
        standardized
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArtifactError {
    #[error("unsupported schema version {0}, expected {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("unexpected features {0:?}, expected {FEATURE_NAMES:?}")]
    FeatureMismatch(Vec<String>),

    #[error("scaler mean of `{feature}` is not finite")]
    NonFiniteMean { feature: &'static str },

    #[error("scaler standard deviation of `{feature}` must be positive and finite, got {value}")]
    InvalidScale { feature: &'static str, value: f64 },

    #[error("the artifact has no centroids")]
    NoCentroids,

    #[error("centroid #{0} has non-finite coordinates")]
    NonFiniteCentroid(usize),
}

/// Result of the nearest-centroid assignment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Assignment {
    pub cluster_id: ClusterId,

    /// Euclidean distance to the centroid in the standardized space.
    pub distance: f64,
}

/// Validated, read-only nearest-centroid model.
#[derive(Debug)]
#[must_use]
pub struct Classifier {
    scaler: Scaler,
    centroids: Vec<[f64; N_FEATURES]>,
    profiles: BTreeMap<ClusterId, ApplianceProfile>,
}

impl TryFrom<ClassifierArtifact> for Classifier {
    type Error = ArtifactError;

    fn try_from(artifact: ClassifierArtifact) -> Result<Self, Self::Error> {
        if artifact.schema_version != SCHEMA_VERSION {
            return Err(ArtifactError::UnsupportedVersion(artifact.schema_version));
        }
        if artifact.features.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ArtifactError::FeatureMismatch(artifact.features));
        }
        for ((feature, mean), std) in
            FEATURE_NAMES.into_iter().zip(artifact.scaler.mean).zip(artifact.scaler.std)
        {
            if !mean.is_finite() {
                return Err(ArtifactError::NonFiniteMean { feature });
            }
            if !std.is_finite() || std <= 0.0 {
                return Err(ArtifactError::InvalidScale { feature, value: std });
            }
        }
        if artifact.centroids.is_empty() {
            return Err(ArtifactError::NoCentroids);
        }
        if let Some(index) = artifact
            .centroids
            .iter()
            .position(|centroid| centroid.iter().any(|coordinate| !coordinate.is_finite()))
        {
            return Err(ArtifactError::NonFiniteCentroid(index));
        }
        for cluster_id in artifact.profiles.keys() {
            if cluster_id.0 >= artifact.centroids.len() {
                warn!(%cluster_id, "profile does not match any centroid");
            }
        }
        Ok(Self {
            scaler: artifact.scaler,
            centroids: artifact.centroids,
            profiles: artifact.profiles,
        })
    }
}

impl Classifier {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context("failed to read the model artifact")?;
        let artifact: ClassifierArtifact =
            serde_json::from_str(&contents).context("failed to parse the model artifact")?;
        let classifier = Self::try_from(artifact).context("invalid model artifact")?;
        info!(
            n_clusters = classifier.centroids.len(),
            n_profiles = classifier.profiles.len(),
            "loaded the window classifier",
        );
        Ok(classifier)
    }

    /// Assign the features to the nearest centroid, the lowest cluster index wins ties.
    pub fn nearest(&self, features: FeatureVector) -> Assignment {
        let standardized = self.scaler.transform(features.to_array());
        let mut assignment = Assignment { cluster_id: ClusterId(0), distance: f64::INFINITY };
        for (index, centroid) in self.centroids.iter().enumerate() {
            let distance = euclidean_distance(&standardized, centroid);
            if distance < assignment.distance {
                assignment = Assignment { cluster_id: ClusterId(index), distance };
            }
        }
        assignment
    }

    #[must_use]
    pub fn profile(&self, cluster_id: ClusterId) -> Option<&ApplianceProfile> {
        self.profiles.get(&cluster_id)
    }

    pub const fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    #[must_use]
    pub fn centroids(&self) -> &[[f64; N_FEATURES]] {
        &self.centroids
    }
}

fn euclidean_distance(lhs: &[f64; N_FEATURES], rhs: &[f64; N_FEATURES]) -> f64 {
    lhs.iter().zip(rhs).map(|(lhs, rhs)| (lhs - rhs).powi(2)).sum::<f64>().sqrt()
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn profile(name: &str) -> ApplianceProfile {
        ApplianceProfile {
            name: name.to_owned(),
            reason: format!("{name} reason"),
            appliance: format!("{name} appliance"),
            color: "#000000".to_owned(),
            icon: "FaLeaf".to_owned(),
        }
    }

    pub fn artifact() -> ClassifierArtifact {
        ClassifierArtifact {
            schema_version: SCHEMA_VERSION,
            features: FEATURE_NAMES.map(str::to_owned).to_vec(),
            scaler: Scaler { mean: [60.0, 0.2, 10.0], std: [30.0, 0.1, 5.0] },
            centroids: vec![[2.0, 1.0, -1.0], [0.0, 0.0, 0.0], [-1.0, 1.0, 0.0]],
            profiles: BTreeMap::from([
                (ClusterId(0), profile("long")),
                (ClusterId(1), profile("standard")),
                (ClusterId(2), profile("short")),
            ]),
        }
    }

    pub fn classifier() -> Classifier {
        Classifier::try_from(artifact()).unwrap()
    }

    #[test]
    fn test_standardize() {
        let standardized = artifact().scaler.transform([90.0, 0.4, 5.0]);
        assert_abs_diff_eq!(standardized[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(standardized[1], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(standardized[2], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nearest() {
        let classifier = classifier();
        let long = FeatureVector { duration_minutes: 120, depth: 0.3, stability: 5.0 };
        assert_eq!(classifier.nearest(long).cluster_id, ClusterId(0));
        assert_abs_diff_eq!(classifier.nearest(long).distance, 0.0, epsilon = 1e-9);

        let standard = FeatureVector { duration_minutes: 60, depth: 0.2, stability: 10.0 };
        assert_eq!(classifier.nearest(standard).cluster_id, ClusterId(1));

        let short = FeatureVector { duration_minutes: 30, depth: 0.3, stability: 10.0 };
        assert_eq!(classifier.nearest(short).cluster_id, ClusterId(2));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let mut artifact = artifact();
        artifact.centroids = vec![[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]];
        let classifier = Classifier::try_from(artifact).unwrap();
        let midpoint = FeatureVector { duration_minutes: 60, depth: 0.2, stability: 10.0 };
        assert_eq!(classifier.nearest(midpoint).cluster_id, ClusterId(0));
    }

    #[test]
    fn test_deterministic() {
        let classifier = classifier();
        let features = FeatureVector { duration_minutes: 90, depth: 0.25, stability: 7.5 };
        let first = classifier.nearest(features);
        for _ in 0..10 {
            assert_eq!(classifier.nearest(features), first);
        }
    }

    #[test]
    fn test_profile_lookup() {
        let classifier = classifier();
        assert_eq!(classifier.profile(ClusterId(1)).unwrap().name, "standard");
        assert!(classifier.profile(ClusterId(7)).is_none());
    }

    #[test]
    fn test_validation() {
        let mut unsupported = artifact();
        unsupported.schema_version = 2;
        assert_eq!(
            Classifier::try_from(unsupported).unwrap_err(),
            ArtifactError::UnsupportedVersion(2),
        );

        let mut reordered = artifact();
        reordered.features.swap(0, 1);
        assert!(matches!(
            Classifier::try_from(reordered).unwrap_err(),
            ArtifactError::FeatureMismatch(_),
        ));

        let mut zero_scale = artifact();
        zero_scale.scaler.std[2] = 0.0;
        assert_eq!(
            Classifier::try_from(zero_scale).unwrap_err(),
            ArtifactError::InvalidScale { feature: "stability", value: 0.0 },
        );

        let mut no_centroids = artifact();
        no_centroids.centroids.clear();
        assert_eq!(Classifier::try_from(no_centroids).unwrap_err(), ArtifactError::NoCentroids);

        let mut broken_centroid = artifact();
        broken_centroid.centroids[1][0] = f64::NAN;
        assert_eq!(
            Classifier::try_from(broken_centroid).unwrap_err(),
            ArtifactError::NonFiniteCentroid(1),
        );
    }

    #[test]
    fn test_json_schema() -> Result {
        let json = serde_json::json!({
            "schema_version": 1,
            "features": ["duration", "depth", "stability"],
            "scaler": { "mean": [60.0, 0.2, 10.0], "std": [30.0, 0.1, 5.0] },
            "centroids": [[0.0, 0.0, 0.0]],
            "profiles": {
                "0": {
                    "name": "Standard Green Window",
                    "reason": "Good for everyday appliances.",
                    "appliance": "Dishwasher",
                    "color": "#48BB78",
                    "icon": "FaCogs",
                },
            },
        });
        let artifact: ClassifierArtifact = serde_json::from_value(json.clone())?;
        assert_eq!(artifact.profiles[&ClusterId(0)].name, "Standard Green Window");
        assert_eq!(serde_json::to_value(&artifact)?, json);
        Ok(())
    }

    #[test]
    fn test_sample_model_file() -> Result {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/window_classifier.json");
        let classifier = Classifier::from_file(&path)?;
        assert_eq!(classifier.centroids().len(), 3);
        for index in 0..3 {
            assert!(classifier.profile(ClusterId(index)).is_some());
        }
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(Classifier::from_file(Path::new("/nonexistent/model.json")).is_err());
    }
}
