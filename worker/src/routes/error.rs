//! Error bodies shared by the insight routes.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::service::InsightError;
use tokio::task::JoinError;

/// Error response returned by the insight routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

/// Status code and body returned on failure.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
    fn with_status(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
        (
            status,
            Json(Self {
                error: error.to_string(),
                message: message.into(),
            }),
        )
    }

    /// Body for a request payload axum could not decode.
    pub fn invalid_json(rejection: &JsonRejection) -> ApiError {
        Self::with_status(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text())
    }

    /// Body for a failed insight request.
    pub fn from_insight_error(error: &InsightError) -> ApiError {
        match error {
            InsightError::Input(e) => {
                Self::with_status(StatusCode::BAD_REQUEST, "invalid_request", e.to_string())
            }
            InsightError::SourceUnavailable(e) => Self::with_status(
                StatusCode::SERVICE_UNAVAILABLE,
                "source_unavailable",
                e.to_string(),
            ),
            InsightError::Dispatch(e) => {
                Self::with_status(StatusCode::BAD_GATEWAY, "dispatch_failed", e.to_string())
            }
        }
    }

    /// Body for a blocking task that did not finish.
    pub fn from_join_error(error: &JoinError) -> ApiError {
        tracing::error!(error = %error, "Insight task did not complete");
        Self::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "insight task did not complete",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::InputError;
    use shared::notify::DispatchError;
    use shared::storage::SourceError;

    #[test]
    fn test_insight_error_status_mapping() {
        let cases = [
            (
                InsightError::Input(InputError::NotSingleRecord(2)),
                StatusCode::BAD_REQUEST,
            ),
            (
                InsightError::SourceUnavailable(SourceError::Unavailable("down".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                InsightError::Dispatch(DispatchError::Rejected("full".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            let (status, Json(body)) = ErrorResponse::from_insight_error(&error);
            assert_eq!(status, expected);
            assert_eq!(body.message, error.to_string().split_once(": ").unwrap().1);
        }
    }
}
