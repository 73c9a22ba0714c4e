use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use asset_api::config::AppConfig;
use asset_api::database::{DatabaseManager, PgAssetStore};
use asset_api::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "asset-api")]
#[command(about = "Owner-scoped asset CRUD API")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides ASSET_API_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides ASSET_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Do not apply database migrations at startup")]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SIGNING_KEY
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asset_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.skip_migrations {
        config.database.run_migrations = false;
    }
    tracing::info!("Starting asset API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the asset database")?;
    tracing::info!("Database connected successfully");

    let state = AppState::new(&config, Arc::new(PgAssetStore::new(pool.clone())));
    let app = asset_api::app(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Asset API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
