pub mod artifacts;
pub mod classifiers;
pub mod errors;
mod registry;
pub mod transforms;

pub use artifacts::{
    load_classifier, load_transform, ArtifactPaths, ModelBundle, CLASSIFIER_FILE,
    NORMALIZER_FILE, STANDARDIZER_FILE,
};
pub use classifiers::{DecisionTree, LinearClassifier, NearestCentroid, RandomForest, TREE_LEAF};
pub use errors::ModelError;
pub use registry::{Classifier, ClassifierArtifact};
pub use transforms::{MinMaxScaler, StandardScaler, Transform, TransformArtifact};

#[cfg(test)]
mod tests;
