use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    Extension,
};
use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::database::{Asset, AssetPatch};
use crate::error::AssetAction;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AssetError;
use crate::state::AppState;

use super::utils::read_json;

/// GET /assets/:id - One asset, only if the caller owns it
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Asset> {
    let asset = state
        .assets
        .get(&caller, &id)
        .await
        .map_err(|e| e.into_api_error(AssetAction::View))?;

    Ok(ApiResponse::success(asset))
}

/// PUT /assets/:id - Merge the supplied fields into the caller's asset
pub async fn put(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<Value> {
    let body = read_json(payload)?;
    let patch = AssetPatch::from_json(&body)
        .map_err(|e| AssetError::from(e).into_api_error(AssetAction::Edit))?;

    let changed = state
        .assets
        .update(&caller, &id, patch)
        .await
        .map_err(|e| e.into_api_error(AssetAction::Edit))?;

    Ok(ApiResponse::success(json!({ "updatedCount": changed })))
}

/// DELETE /assets/:id - Permanently remove the caller's asset
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state
        .assets
        .delete(&caller, &id)
        .await
        .map_err(|e| e.into_api_error(AssetAction::Delete))?;

    Ok(ApiResponse::no_content())
}
