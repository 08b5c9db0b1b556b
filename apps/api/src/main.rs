mod config;
mod db;
mod errors;
mod feedback;
mod models;
mod routes;
mod state;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::feedback::query::QueryBuilder;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Feedback Loop API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (watch-list store)
    let db = create_pool(&config.database_url).await?;

    // Initialize the upstream feedback gateway. The auth token stays out of
    // the logs.
    let gateway = Arc::new(UpstreamClient::new(
        config.api_base_url.clone(),
        config.api_auth_token.clone(),
    ));
    info!("Upstream feedback client initialized (base: {})", config.api_base_url);

    // Query builder carries the sorting table and the configured page size
    let query_builder = QueryBuilder::new(config.per_page);
    info!("Feedback page size: {}", config.per_page);

    // Build app state
    let state = AppState {
        db,
        gateway,
        query_builder,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
