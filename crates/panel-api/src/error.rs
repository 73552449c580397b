use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the HTTP surface. Storage failures are folded into
/// `Database` and rendered as a generic 500; the underlying cause is only
/// logged, never sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(#[from] anyhow::Error),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::InvalidToken => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Database(e) => {
                error!("database error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
