//! Error types for the scenario API server.
//!
//! [`ApiError`] unifies board and store failures into a single enum that
//! converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scenario_core::ScenarioError;

use crate::store::StoreError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The board rejected a command.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// Reading or writing the document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Scenario(ScenarioError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Scenario(ScenarioError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            Self::Scenario(
                ScenarioError::ScenarioNotFound(_) | ScenarioError::InterventionNotFound { .. },
            ) => StatusCode::NOT_FOUND,
            Self::Scenario(ScenarioError::InvalidState(_)) | Self::Store(StoreError::NotConfigured) => {
                StatusCode::CONFLICT
            }
            Self::Scenario(ScenarioError::ArithmeticOverflow(_))
            | Self::Store(StoreError::Io { .. } | StoreError::Json { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_types::ScenarioOrdinal;

    #[test]
    fn board_errors_map_to_distinct_statuses() {
        let cases = [
            (
                ApiError::from(ScenarioError::Validation(String::from("product not selected"))),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(ScenarioError::InvalidArgument(String::from("x is NaN"))),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(ScenarioError::ScenarioNotFound(ScenarioOrdinal(4))),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ScenarioError::InvalidState(String::from("editor is closed"))),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(ScenarioError::ArithmeticOverflow("scenario ordinal")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::from(StoreError::NotConfigured), StatusCode::CONFLICT),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error}");
        }
    }

    #[test]
    fn validation_message_is_passed_through() {
        let error = ApiError::from(ScenarioError::Validation(String::from("product not selected")));
        assert_eq!(error.to_string(), "product not selected");
    }
}
