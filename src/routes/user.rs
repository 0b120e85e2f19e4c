//! Dashboard endpoints (require UserSession), plus the public bot counters.

use crate::auth::middleware::{AppState, UserSession};
use crate::error::AppError;
use crate::models::{ChatQuery, SendMessageRequest, UpdateUsernameRequest};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

const MAX_MESSAGE_CHARS: usize = 2000;

/// Usernames are 3-20 characters of letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.len() < 3 || username.len() > 20 {
        return Err(AppError::BadRequest(
            "Username must be 3-20 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::BadRequest(
            "Username may only contain letters, numbers, and underscores".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/bot/stats — Public bot counters
pub async fn bot_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.api.bot_stats().await)
}

/// GET /api/me — Current user profile
pub async fn me(session: UserSession, State(state): State<AppState>) -> impl IntoResponse {
    Json(state.api.current_user(&session.token).await)
}

/// PUT /api/me/username — Change username
pub async fn update_username(
    session: UserSession,
    State(state): State<AppState>,
    Json(req): Json<UpdateUsernameRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_username(&req.username)?;

    let resp = state
        .api
        .update_username(&session.token, &req.username)
        .await;

    if resp.success {
        tracing::info!(action = "username_updated", user = ?session.claims.subject(), username = %req.username, "Username changed");
    }

    Ok(Json(resp))
}

/// GET /api/chat/messages — Chat history page
pub async fn chat_messages(
    session: UserSession,
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_limit(query.limit)?;

    Ok(Json(
        state
            .api
            .chat_messages(&session.token, query.limit, query.offset)
            .await,
    ))
}

/// POST /api/chat/messages — Append a chat message
pub async fn send_chat_message(
    session: UserSession,
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::BadRequest(format!(
            "Message exceeds {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    Ok(Json(
        state.api.send_chat_message(&session.token, message).await,
    ))
}
