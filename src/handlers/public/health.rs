use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Liveness
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "message": "Asset service is running" }))
}

/// GET /health - Readiness, including a store ping
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.assets.store().ping().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "store": "ok",
        }))),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            Err(ApiError::service_unavailable("Store unavailable"))
        }
    }
}
