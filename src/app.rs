use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, request_timeout_middleware};
use crate::state::AppState;

/// Build the full router for the given state
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(asset_routes(&state))
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), request_timeout_middleware))
        .layer(DefaultBodyLimit::max(state.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    if state.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

fn asset_routes(state: &AppState) -> Router<AppState> {
    use protected::assets;

    Router::new()
        // Collection-level operations
        .route("/assets", get(assets::collection_get).post(assets::collection_post))
        // Record-level operations
        .route(
            "/assets/:id",
            get(assets::record_get)
                .put(assets::record_put)
                .delete(assets::record_delete),
        )
        // route_layer so unknown paths still 404 instead of demanding a token
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}
