use agronomy_core::PipelineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("{0}")]
    BadRequest(String),
    #[error("This page requires a database connection.")]
    DatabaseUnavailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PipelineError> for WebError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingField { fields } => {
                WebError::BadRequest(format!("Error: Missing form field ({})", fields.join(", ")))
            }
            PipelineError::InvalidValue { field, .. } => {
                WebError::BadRequest(format!("Error: Invalid value for {field}"))
            }
            PipelineError::ModelInvocation(source) => WebError::Internal(source.to_string()),
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::Internal(format!("{err:#}"))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            WebError::DatabaseUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
            }
            WebError::Internal(detail) => {
                tracing::error!(detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred",
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agronomy_model::ModelError;

    #[test]
    fn missing_fields_are_listed() {
        let err = WebError::from(PipelineError::MissingField {
            fields: vec!["Ph", "Rainfall"],
        });
        assert_eq!(err.to_string(), "Error: Missing form field (Ph, Rainfall)");
    }

    #[test]
    fn invalid_value_names_the_field_only() {
        let err = WebError::from(PipelineError::InvalidValue {
            field: "Temperature",
            value: "warm".into(),
        });
        assert_eq!(err.to_string(), "Error: Invalid value for Temperature");
    }

    #[test]
    fn status_codes() {
        let bad = WebError::BadRequest("nope".into()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let offline = WebError::DatabaseUnavailable.into_response();
        assert_eq!(offline.status(), StatusCode::SERVICE_UNAVAILABLE);

        let model = WebError::from(PipelineError::ModelInvocation(ModelError::NonFinite {
            artifact: "classifier",
            index: 0,
        }))
        .into_response();
        assert_eq!(model.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
