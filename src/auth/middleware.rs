//! Axum wiring for the access gate, plus session extractors for JSON endpoints.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::cookies::{find_cookie, ADMIN_COOKIE, USER_COOKIE};
use super::gate::{Decision, GatePaths};
use super::token::{try_decode, Claims};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub config: Arc<Config>,
    pub gate: Arc<GatePaths>,
}

impl AppState {
    pub fn new(api: ApiClient, config: Config) -> Self {
        let gate = Arc::new(config.gate_paths());
        AppState {
            api,
            config: Arc::new(config),
            gate,
        }
    }
}

/// Redirects requests for protected pages that lack a usable session cookie.
///
/// Reads nothing but the path and the two session cookies.
pub async fn access_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let user_token = find_cookie(headers, USER_COOKIE);
    let admin_token = find_cookie(headers, ADMIN_COOKIE);

    let path = request.uri().path().to_owned();
    match state
        .gate
        .evaluate_request(&path, user_token.as_deref(), admin_token.as_deref())
    {
        Decision::Forward => next.run(request).await,
        Decision::Redirect(reason) => {
            tracing::debug!(action = "gate_redirect", path = %path, reason = %reason, "Redirecting to login");
            Redirect::temporary(&state.config.login_path).into_response()
        }
    }
}

/// Logged-in user extractor.
///
/// Reads the user session cookie. Returns 401 Unauthorized if missing or
/// undecodable. The signature is not checked; the API does that.
pub struct UserSession {
    pub token: String,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = find_cookie(&parts.headers, USER_COOKIE)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))?;

        let claims = try_decode(&token)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))?;

        Ok(UserSession { token, claims })
    }
}

/// Admin-only session extractor.
///
/// Reads the admin session cookie and requires `isAdmin: true`.
/// Returns 401 if missing or undecodable, 403 if not admin.
pub struct AdminSession {
    pub token: String,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = find_cookie(&parts.headers, ADMIN_COOKIE)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Admin login required".to_string()))?;

        let claims = try_decode(&token)
            .map_err(|e| AppError::Unauthorized(format!("Invalid admin session: {}", e)))?;

        if !claims.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminSession { token, claims })
    }
}
