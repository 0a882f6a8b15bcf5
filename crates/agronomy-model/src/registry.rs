use serde::{Deserialize, Serialize};

use crate::classifiers::{DecisionTree, LinearClassifier, NearestCentroid, RandomForest};
use crate::errors::ModelError;

/// A fitted classifier mapping one feature vector to one class id.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn n_features(&self) -> usize;
    /// Class ids the model can emit, in training order.
    fn classes(&self) -> &[i64];
    fn predict(&self, input: &[f64]) -> Result<i64, ModelError>;
}

/// On-disk form of a classifier, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    NearestCentroid(NearestCentroid),
    Linear(LinearClassifier),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ClassifierArtifact {
    pub fn from_json(document: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(document).map_err(|source| {
            ModelError::Decode {
                artifact: "classifier",
                source,
            }
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ClassifierArtifact::NearestCentroid(model) => model.validate(),
            ClassifierArtifact::Linear(model) => model.validate(),
            ClassifierArtifact::DecisionTree(model) => model.validate(),
            ClassifierArtifact::RandomForest(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierArtifact::NearestCentroid(model) => model,
            ClassifierArtifact::Linear(model) => model,
            ClassifierArtifact::DecisionTree(model) => model,
            ClassifierArtifact::RandomForest(model) => model,
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn classes(&self) -> &[i64] {
        self.inner().classes()
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        self.inner().predict(input)
    }
}
