mod common;
mod linear;
mod nearest_centroid;
mod tree;

pub use linear::LinearClassifier;
pub use nearest_centroid::NearestCentroid;
pub use tree::{DecisionTree, RandomForest, TREE_LEAF};
