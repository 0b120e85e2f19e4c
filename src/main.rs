//! Dashboard gateway entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Build the external API client
//! 3. Build router: API routes, static pages, access gate, security headers
//! 4. Start Axum server

use quantumx_dashboard::{api::ApiClient, auth::AppState, config::Config, routes};
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("Failed to load config");
    tracing::info!(config = ?config, "Starting dashboard gateway on {}", config.bind_addr);

    let api = ApiClient::new(
        &config.api_url,
        &config.api_key,
        Duration::from_secs(config.api_timeout_secs),
    )
    .expect("Failed to build API client");

    let bind_addr = config.bind_addr;
    let state = AppState::new(api, config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
