//! API route handlers.

pub mod admin;
pub mod auth;
pub mod user;

use crate::auth::middleware::{access_gate, AppState};
use crate::error::AppError;
use crate::middleware::security_headers;
use axum::{routing::get, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Listing page sizes accepted by the API.
pub fn validate_limit(limit: u32) -> Result<(), AppError> {
    if !(1..=100).contains(&limit) {
        return Err(AppError::BadRequest(
            "limit must be between 1 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Session endpoints
        .route("/api/auth/callback", get(auth::oauth_callback))
        .route("/api/auth/admin/login", post(auth::admin_login))
        .route("/api/auth/logout", post(auth::logout))
        // Public
        .route("/api/bot/stats", get(user::bot_stats))
        // Dashboard endpoints
        .route("/api/me", get(user::me))
        .route("/api/me/username", axum::routing::put(user::update_username))
        .route(
            "/api/chat/messages",
            get(user::chat_messages).post(user::send_chat_message),
        )
        // Admin endpoints
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/servers", get(admin::list_servers))
        .route("/api/admin/servers/blacklist", post(admin::blacklist_server))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/blacklist", post(admin::blacklist_user))
        .route("/api/admin/moderation/logs", post(admin::moderation_logs))
        .route("/api/admin/commands/analytics", get(admin::command_analytics))
        .route("/api/admin/analytics", get(admin::analytics))
}

/// Full application: API routes, static pages as fallback, the access gate
/// over everything, then security headers.
pub fn app(state: AppState) -> Router {
    // Single-origin deployment: no cross-origin requests are allowed.
    let cors = CorsLayer::new();

    api_router()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_gate,
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state)
}
