use std::net::SocketAddr;
use std::sync::Arc;

use asset_api::config::AppConfig;
use asset_api::database::MemoryAssetStore;
use asset_api::state::AppState;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tokio::net::TcpListener;

#[allow(dead_code)]
pub const SIGNING_KEY: &str = "integration-test-signing-key";

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
    pub store: Arc<MemoryAssetStore>,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestServer {
    /// Serve the router over an in-memory store on an OS-assigned port
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Same as `start`, with extra configuration variables applied
    pub async fn start_with(extra: &[(&str, &str)]) -> Self {
        let store = Arc::new(MemoryAssetStore::new());
        let addr = serve(AppState::new(&test_config(extra), store.clone())).await;

        Self {
            base_url: format!("http://{addr}"),
            addr,
            store,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Config with the test signing key plus any extra variables
pub fn test_config(extra: &[(&str, &str)]) -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "DATABASE_URL" => Some("postgres://unused/assets".to_string()),
        "JWT_SIGNING_KEY" => Some(SIGNING_KEY.to_string()),
        _ => extra.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string()),
    })
    .expect("test config")
}

/// Serve the router for `state` on an OS-assigned port
pub async fn serve(state: AppState) -> SocketAddr {
    let app = asset_api::app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Token for `user_id` valid for the next hour
#[allow(dead_code)]
pub fn token_for(user_id: i64) -> String {
    token_with_claims(json!({ "user_id": user_id, "exp": chrono::Utc::now().timestamp() + 3600 }), SIGNING_KEY)
}

#[allow(dead_code)]
pub fn token_with_claims(claims: serde_json::Value, key: &str) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(key.as_bytes())).unwrap()
}

#[allow(dead_code)]
pub fn bearer(user_id: i64) -> String {
    format!("Bearer {}", token_for(user_id))
}
