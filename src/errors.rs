use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::directory::DirectoryError;

/// Shown when a connection request fails and the directory gave no reason.
pub const CONNECT_FAILED_MESSAGE: &str = "Connection failed. Request might already be pending.";
/// Shown when a listing or search fails and the directory gave no reason.
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed";

/// ApiError
///
/// Error type of the JSON endpoints under `/api`. Page navigation never produces these:
/// it redirects or renders the fallback instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Your role does not grant access to this resource")]
    Forbidden,

    #[error("directory lookup failed: {0}")]
    Search(#[source] DirectoryError),

    #[error("connection request failed: {0}")]
    Connect(#[source] DirectoryError),
}

/// ErrorResponse
///
/// JSON body of every `ApiError`. Keeps the `success` flag the frontend already checks.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

/// Rejections carry the directory's own message when it sent one; transport failures are
/// logged and replaced by the generic message.
fn directory_failure(err: &DirectoryError, fallback: &str) -> (StatusCode, &'static str, String) {
    match err {
        DirectoryError::Rejected { message } => (
            StatusCode::CONFLICT,
            "DIRECTORY_REJECTED",
            message.clone().unwrap_or_else(|| fallback.to_string()),
        ),
        other => {
            tracing::error!("directory backend unavailable: {:?}", other);
            (
                StatusCode::BAD_GATEWAY,
                "DIRECTORY_UNAVAILABLE",
                fallback.to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", self.to_string())
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            ApiError::Search(err) => directory_failure(err, SEARCH_FAILED_MESSAGE),
            ApiError::Connect(err) => directory_failure(err, CONNECT_FAILED_MESSAGE),
        };

        let body = ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
