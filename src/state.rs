use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::database::AssetStore;
use crate::services::AssetService;

/// Shared application state. Built once at startup and cloned into every
/// request; nothing in here is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub assets: AssetService,
    pub signing_key: Arc<[u8]>,
    pub request_timeout: Duration,
    pub max_request_size_bytes: usize,
    pub enable_cors: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn AssetStore>) -> Self {
        Self {
            assets: AssetService::new(store),
            signing_key: Arc::from(config.security.jwt_signing_key.as_bytes()),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            max_request_size_bytes: config.server.max_request_size_bytes,
            enable_cors: config.security.enable_cors,
        }
    }
}
