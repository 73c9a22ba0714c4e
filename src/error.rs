// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::services::AssetError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 408 Request Timeout
    RequestTimeout(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::RequestTimeout(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Every failure body carries exactly one `error` field
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn request_timeout(message: impl Into<String>) -> Self {
        ApiError::RequestTimeout(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing | AuthError::Malformed => ApiError::unauthorized(err.to_string()),
            AuthError::Expired | AuthError::Invalid => ApiError::forbidden(err.to_string()),
        }
    }
}

/// The asset operation a handler was performing, used to word failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetAction {
    Create,
    List,
    View,
    Edit,
    Delete,
}

impl AssetAction {
    fn failure_message(self) -> &'static str {
        match self {
            AssetAction::Create => "Failed to create asset",
            AssetAction::List => "Failed to retrieve assets",
            AssetAction::View => "Failed to retrieve asset",
            AssetAction::Edit => "Failed to update asset",
            AssetAction::Delete => "Failed to delete asset",
        }
    }

    fn not_found_message(self) -> &'static str {
        match self {
            AssetAction::Edit => "Asset not found or you do not have permission to edit it",
            AssetAction::Delete => "Asset not found or you do not have permission to delete it",
            _ => "Asset not found or you do not have permission to view it",
        }
    }
}

impl AssetError {
    /// Map to an HTTP error. Store details are logged here and never sent to the client.
    pub fn into_api_error(self, action: AssetAction) -> ApiError {
        match self {
            AssetError::InvalidIdentifier(_) => ApiError::bad_request("Invalid asset ID format"),
            AssetError::Validation(e) => ApiError::bad_request(e.to_string()),
            AssetError::NotFound => ApiError::not_found(action.not_found_message()),
            AssetError::Store(e) => {
                tracing::error!("{}: {}", action.failure_message(), e);
                ApiError::internal_server_error(action.failure_message())
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
