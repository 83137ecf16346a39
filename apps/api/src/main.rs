mod config;
mod errors;
mod jobs;
mod models;
mod resume;
mod routes;
mod state;
mod text;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    let cors = cors_layer(&config)?;
    let state = AppState::new(config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive unless `CORS_ALLOWED_ORIGIN` pins a single origin.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = config.cors_allowed_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ALLOWED_ORIGIN is not a valid origin: {origin}"))?;
    info!("CORS restricted to {origin:?}");

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
