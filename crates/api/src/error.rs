//! HTTP error mapping.
//!
//! Every handler returns `ApiResult<T>`; domain errors map onto status
//! codes here and render as `{"error": "<message>"}` payloads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use callboard_domain::CallboardError;
use serde_json::json;

/// Wrapper that carries a domain error through axum.
#[derive(Debug)]
pub struct ApiError(pub CallboardError);

/// Result alias for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<CallboardError> for ApiError {
    fn from(err: CallboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CallboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CallboardError::Auth(_) => StatusCode::UNAUTHORIZED,
            CallboardError::Forbidden(_) => StatusCode::FORBIDDEN,
            CallboardError::NotFound(_) => StatusCode::NOT_FOUND,
            CallboardError::Network(_) | CallboardError::ExternalService(_) => {
                StatusCode::BAD_GATEWAY
            }
            CallboardError::Database(_)
            | CallboardError::Config(_)
            | CallboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
