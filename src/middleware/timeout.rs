use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Abandon requests that outlive the configured deadline. Dropping the
/// handler future also drops any in-flight store call.
pub async fn request_timeout_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::time::timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            tracing::warn!("{} {} exceeded {:?}, abandoned", method, uri, state.request_timeout);
            Err(ApiError::request_timeout("Request timed out"))
        }
    }
}
