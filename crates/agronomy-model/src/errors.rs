use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {artifact} artifact: {source}")]
    Decode {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{artifact} expects {expected} features, got {actual}")]
    DimensionMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{artifact} has invalid parameters: {message}")]
    InvalidParameters {
        artifact: &'static str,
        message: String,
    },

    #[error("{artifact} produced a non-finite value at feature {index}")]
    NonFinite { artifact: &'static str, index: usize },
}

impl ModelError {
    pub(crate) fn invalid(artifact: &'static str, message: impl Into<String>) -> Self {
        ModelError::InvalidParameters {
            artifact,
            message: message.into(),
        }
    }
}

pub(crate) fn check_dimensions(
    artifact: &'static str,
    expected: usize,
    input: &[f64],
) -> Result<(), ModelError> {
    if input.len() == expected {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            artifact,
            expected,
            actual: input.len(),
        })
    }
}

pub(crate) fn check_finite(artifact: &'static str, values: &[f64]) -> Result<(), ModelError> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(ModelError::NonFinite { artifact, index }),
        None => Ok(()),
    }
}
