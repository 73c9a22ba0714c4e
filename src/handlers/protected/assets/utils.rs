use axum::{body::Bytes, extract::rejection::BytesRejection, http::StatusCode};
use serde_json::Value;

use crate::error::ApiError;

/// Parse a request body as JSON whatever its `Content-Type`. Bodies over the
/// configured size limit are 413; anything else unreadable is 400.
pub fn read_json(payload: Result<Bytes, BytesRejection>) -> Result<Value, ApiError> {
    let bytes = payload.map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection);
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Request body too large")
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!("Request body is not valid JSON: {}", e);
        ApiError::bad_request(format!("Invalid JSON body: {}", e))
    })
}
