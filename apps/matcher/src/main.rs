mod analysis_client;
mod config;
mod errors;
mod lifecycle;
mod presentation;
mod projection;
mod report;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis_client::AnalysisClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; the analysis URL is fixed from here on
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize analysis client
    let client = AnalysisClient::new(&config)?;
    info!("Analysis client initialized (endpoint: {})", client.endpoint());

    let state = AppState::new(config.clone(), Arc::new(client));
    info!(
        "Session store initialized (idle timeout: {}s)",
        config.session_idle_secs
    );

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors(&config)?),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive unless `ALLOWED_ORIGIN` pins a single origin.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    match &config.allowed_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("ALLOWED_ORIGIN is not a valid origin: '{origin}'"))?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any))
        }
        None => Ok(CorsLayer::permissive()),
    }
}
