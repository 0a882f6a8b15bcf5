//! Loading the three fitted artifacts the prediction pipeline depends on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ModelError;
use crate::registry::{Classifier, ClassifierArtifact};
use crate::transforms::{Transform, TransformArtifact};

pub const NORMALIZER_FILE: &str = "normalizer.json";
pub const STANDARDIZER_FILE: &str = "standardizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub normalizer: PathBuf,
    pub standardizer: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside a single model directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            normalizer: dir.join(NORMALIZER_FILE),
            standardizer: dir.join(STANDARDIZER_FILE),
            classifier: dir.join(CLASSIFIER_FILE),
        }
    }
}

fn read_artifact(path: &Path) -> Result<String, ModelError> {
    fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_transform(path: &Path) -> Result<TransformArtifact, ModelError> {
    TransformArtifact::from_json(&read_artifact(path)?)
}

pub fn load_classifier(path: &Path) -> Result<ClassifierArtifact, ModelError> {
    ClassifierArtifact::from_json(&read_artifact(path)?)
}

/// The fitted normalizer, standardizer and classifier, checked to agree on
/// the number of features.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub normalizer: TransformArtifact,
    pub standardizer: TransformArtifact,
    pub classifier: ClassifierArtifact,
}

impl ModelBundle {
    pub fn new(
        normalizer: TransformArtifact,
        standardizer: TransformArtifact,
        classifier: ClassifierArtifact,
    ) -> Result<Self, ModelError> {
        let expected = normalizer.n_features();
        for (artifact, actual) in [
            ("standardizer", standardizer.n_features()),
            ("classifier", classifier.n_features()),
        ] {
            if actual != expected {
                return Err(ModelError::DimensionMismatch {
                    artifact,
                    expected,
                    actual,
                });
            }
        }
        Ok(Self {
            normalizer,
            standardizer,
            classifier,
        })
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ModelError> {
        Self::new(
            load_transform(&paths.normalizer)?,
            load_transform(&paths.standardizer)?,
            load_classifier(&paths.classifier)?,
        )
    }

    pub fn n_features(&self) -> usize {
        self.normalizer.n_features()
    }
}
