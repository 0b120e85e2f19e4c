//! Session establishment and teardown.

use crate::auth::cookies::{append_cookie, removal_cookie, session_cookie, ADMIN_COOKIE, USER_COOKIE};
use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::models::{AdminLoginRequest, CallbackParams};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

fn login_error(state: &AppState, code: &str) -> Response {
    Redirect::temporary(&format!("{}?error={}", state.config.login_path, code)).into_response()
}

/// GET /api/auth/callback — OAuth redirect target; exchanges the code for a user session
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        tracing::info!(action = "oauth_denied", error = %error, "OAuth provider returned an error");
        return Ok(login_error(&state, "access_denied"));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Ok(login_error(&state, "no_code"));
    };

    let resp = match state.api.google_auth(&code).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(action = "auth_error", error = %e, "Code exchange failed");
            return Ok(login_error(&state, "server_error"));
        }
    };

    let Some(grant) = resp.into_data() else {
        tracing::warn!(action = "auth_failed", "Code exchange rejected");
        return Ok(login_error(&state, "auth_failed"));
    };

    let mut response = Redirect::temporary(&state.config.user_prefix).into_response();
    append_cookie(
        response.headers_mut(),
        &session_cookie(
            USER_COOKIE,
            &grant.token,
            state.config.user_session_ttl_secs,
            state.config.cookie_secure,
        ),
    )?;

    tracing::info!(action = "auth_success", "User session established");

    Ok(response)
}

/// POST /api/auth/admin/login — Exchange admin credentials for an admin session
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Response, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let resp = state.api.admin_login(&req.username, &req.password).await;
    let error = resp.error.clone();
    let Some(grant) = resp.into_data() else {
        tracing::warn!(action = "admin_auth_failed", username = %req.username, "Admin login rejected");
        return Err(AppError::Unauthorized(
            error.unwrap_or_else(|| "Invalid credentials".to_string()),
        ));
    };

    let mut response = Json(json!({ "success": true })).into_response();
    append_cookie(
        response.headers_mut(),
        &session_cookie(
            ADMIN_COOKIE,
            &grant.token,
            state.config.admin_session_ttl_secs,
            state.config.cookie_secure,
        ),
    )?;

    tracing::info!(action = "admin_auth_success", username = %req.username, "Admin session established");

    Ok(response)
}

/// POST /api/auth/logout — Drop both session cookies
pub async fn logout() -> Result<Response, AppError> {
    let mut response = Json(json!({ "success": true })).into_response();
    append_cookie(response.headers_mut(), &removal_cookie(USER_COOKIE))?;
    append_cookie(response.headers_mut(), &removal_cookie(ADMIN_COOKIE))?;

    tracing::info!(action = "logout", "Session cookies cleared");

    Ok(response)
}
