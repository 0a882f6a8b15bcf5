pub mod accounts;
pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod features;
pub mod labels;
pub mod pipeline;
pub mod validation;

pub use error::{PipelineError, Result};
pub use features::{Feature, FeatureVector, RawSubmission, FEATURE_COUNT};
pub use pipeline::{Prediction, PredictionPipeline};
