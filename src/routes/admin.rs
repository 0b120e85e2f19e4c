//! Admin API endpoints (all require AdminSession).

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{AnalyticsQuery, BlacklistServerRequest, BlacklistUserRequest, ListQuery};
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn require(value: &str, label: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", label)));
    }
    Ok(())
}

/// GET /api/admin/stats — Bot overview
pub async fn stats(session: AdminSession, State(state): State<AppState>) -> impl IntoResponse {
    Json(state.api.admin_bot_stats(&session.token).await)
}

/// GET /api/admin/servers — List servers
pub async fn list_servers(
    session: AdminSession,
    State(state): State<AppState>,
    Query(page): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_limit(page.limit)?;
    Ok(Json(state.api.servers(&session.token, &page).await))
}

/// GET /api/admin/users — List users
pub async fn list_users(
    session: AdminSession,
    State(state): State<AppState>,
    Query(page): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_limit(page.limit)?;
    Ok(Json(state.api.users(&session.token, &page).await))
}

/// POST /api/admin/servers/blacklist — Blacklist a server
pub async fn blacklist_server(
    session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<BlacklistServerRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&req.server_id, "serverId")?;
    require(&req.reason, "reason")?;

    let resp = state.api.blacklist_server(&session.token, &req).await;
    if resp.success {
        tracing::warn!(action = "server_blacklisted", admin = ?session.claims.subject(), server_id = %req.server_id, reason = %req.reason, "Admin blacklisted server");
    }

    Ok(Json(resp))
}

/// POST /api/admin/users/blacklist — Blacklist a user
pub async fn blacklist_user(
    session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<BlacklistUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&req.user_id, "userId")?;
    require(&req.reason, "reason")?;

    let resp = state.api.blacklist_user(&session.token, &req).await;
    if resp.success {
        tracing::warn!(action = "user_blacklisted", admin = ?session.claims.subject(), user_id = %req.user_id, reason = %req.reason, "Admin blacklisted user");
    }

    Ok(Json(resp))
}

/// POST /api/admin/moderation/logs — Filtered moderation log
///
/// An empty body means no filters.
pub async fn moderation_logs(
    session: AdminSession,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let filters = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(Value::Null) => Value::Object(Default::default()),
            Ok(_) => {
                return Err(AppError::BadRequest(
                    "Filters must be a JSON object".to_string(),
                ))
            }
            Err(e) => return Err(AppError::BadRequest(format!("Invalid filters: {}", e))),
        }
    };

    Ok(Json(state.api.moderation_logs(&session.token, &filters).await))
}

/// GET /api/admin/commands/analytics — Command usage
pub async fn command_analytics(
    session: AdminSession,
    State(state): State<AppState>,
) -> impl IntoResponse {
    Json(state.api.command_analytics(&session.token).await)
}

/// GET /api/admin/analytics — Aggregated analytics for a time range
pub async fn analytics(
    session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    let range = query.range.unwrap_or_default();
    Json(state.api.analytics(&session.token, range).await)
}
