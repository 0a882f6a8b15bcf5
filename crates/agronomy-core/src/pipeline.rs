use std::fmt;
use std::sync::Arc;

use agronomy_model::{ArtifactPaths, Classifier, ModelBundle, ModelError, Transform};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::features::{FeatureVector, RawSubmission, FEATURE_COUNT};
use crate::labels;

/// Outcome of one successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub features: FeatureVector,
    pub class_id: i64,
    pub crop: Option<&'static str>,
    pub message: String,
}

impl Prediction {
    /// False when the classifier produced an id outside the label table.
    pub fn is_recommendation(&self) -> bool {
        self.crop.is_some()
    }
}

/// Normalizer, standardizer and classifier, applied in that order.
///
/// The artifacts are read-only after construction, so one pipeline can be
/// shared across any number of concurrent requests behind an `Arc`.
#[derive(Clone)]
pub struct PredictionPipeline {
    normalizer: Arc<dyn Transform>,
    standardizer: Arc<dyn Transform>,
    classifier: Arc<dyn Classifier>,
}

impl PredictionPipeline {
    pub fn new(
        normalizer: Arc<dyn Transform>,
        standardizer: Arc<dyn Transform>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            normalizer,
            standardizer,
            classifier,
        }
    }

    /// Fails unless the bundle takes exactly the seven submitted measurements.
    pub fn from_bundle(bundle: ModelBundle) -> std::result::Result<Self, ModelError> {
        if bundle.n_features() != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                artifact: "model bundle",
                expected: FEATURE_COUNT,
                actual: bundle.n_features(),
            });
        }
        Ok(Self::new(
            Arc::new(bundle.normalizer),
            Arc::new(bundle.standardizer),
            Arc::new(bundle.classifier),
        ))
    }

    pub fn load(paths: &ArtifactPaths) -> std::result::Result<Self, ModelError> {
        Self::from_bundle(ModelBundle::load(paths)?)
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn declared_classes(&self) -> &[i64] {
        self.classifier.classes()
    }

    /// Declared class ids that would fall back to the apology message.
    pub fn unmapped_classes(&self) -> Vec<i64> {
        labels::unmapped_classes(self.classifier.classes())
    }

    /// Validates and parses the raw form values, then runs the models.
    pub fn predict(&self, raw: &RawSubmission) -> Result<Prediction> {
        let features = raw.parse()?;
        self.predict_features(features)
    }

    pub fn predict_features(&self, features: FeatureVector) -> Result<Prediction> {
        let normalized = self.normalizer.transform(features.as_slice())?;
        let standardized = self.standardizer.transform(&normalized)?;
        let class_id = self.classifier.predict(&standardized)?;

        let crop = labels::crop_name(class_id);
        debug!(class_id, crop = crop.unwrap_or("<unmapped>"), "Classified submission");

        Ok(Prediction {
            features,
            class_id,
            crop,
            message: labels::recommendation_message(class_id),
        })
    }
}

impl fmt::Debug for PredictionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionPipeline")
            .field("normalizer", &self.normalizer.name())
            .field("standardizer", &self.standardizer.name())
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
