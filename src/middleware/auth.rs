use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::state::AppState;

/// JWT authentication middleware. Verifies the bearer token and inserts the
/// resulting `CallerIdentity` into the request; rejections short-circuit
/// before the handler (or its body extractor) runs.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| ApiError::from(AuthError::Malformed))?),
        None => None,
    };

    let caller = auth::verify(header, &state.signing_key).map_err(|e| {
        tracing::debug!("Authentication failed: {}", e);
        ApiError::from(e)
    })?;

    tracing::debug!("Authenticated caller {}", caller);
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
