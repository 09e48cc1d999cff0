use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use wishes_types::api::ErrorResponse;

use crate::validation::ValidationError;

/// Everything a greetings request can fail with. Each variant maps to one
/// status code and a caller-safe message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error("Invalid request body")]
    MalformedRequest(String),

    /// Store read failed. The cause is logged, never returned.
    #[error("Failed to fetch greetings")]
    ReadFailed(#[source] anyhow::Error),

    /// Store write failed. The cause is logged, never returned.
    #[error("Failed to save greeting")]
    WriteFailed(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ReadFailed(_) | ApiError::WriteFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::ReadFailed(cause) => error!("Store read error: {:#}", cause),
            ApiError::WriteFailed(cause) => error!("Store insert error: {:#}", cause),
            ApiError::Internal(detail) => error!("Internal error: {}", detail),
            ApiError::MalformedRequest(detail) => tracing::debug!("Rejected body: {}", detail),
            _ => {}
        }

        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::from(ValidationError::NameRequired).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MalformedRequest("eof".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::WriteFailed(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn persistence_cause_is_not_exposed() {
        let err = ApiError::WriteFailed(anyhow::anyhow!("database is locked"));
        assert_eq!(err.to_string(), "Failed to save greeting");

        let err = ApiError::ReadFailed(anyhow::anyhow!("no such table: wishes"));
        assert_eq!(err.to_string(), "Failed to fetch greetings");
    }

    #[test]
    fn validation_message_is_the_rule() {
        let err = ApiError::from(ValidationError::MessageTooLong);
        assert_eq!(err.to_string(), "Message too long");
    }
}
