use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Extension,
};
use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::database::{Asset, NewAsset};
use crate::error::AssetAction;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AssetError;
use crate::state::AppState;

use super::utils::read_json;

/// GET /assets - All assets owned by the caller (possibly empty)
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> ApiResult<Vec<Asset>> {
    let assets = state
        .assets
        .list(&caller)
        .await
        .map_err(|e| e.into_api_error(AssetAction::List))?;

    Ok(ApiResponse::success(assets))
}

/// POST /assets - Create an asset owned by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<Value> {
    let body = read_json(payload)?;
    let fields = NewAsset::from_json(&body)
        .map_err(|e| AssetError::from(e).into_api_error(AssetAction::Create))?;

    let id = state
        .assets
        .create(&caller, fields)
        .await
        .map_err(|e| e.into_api_error(AssetAction::Create))?;

    Ok(ApiResponse::created(json!({ "insertedID": id })))
}
