// crates/agronomy-core/src/error.rs

use agronomy_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing form field: {}", fields.join(", "))]
    MissingField { fields: Vec<&'static str> },

    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] ModelError),
}

impl PipelineError {
    /// Errors caused by the submitted data rather than the loaded model.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingField { .. } | PipelineError::InvalidValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
