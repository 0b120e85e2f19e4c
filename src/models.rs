//! Request and response models.
//!
//! The external API wraps every response in [`ApiResponse`]. Most payloads are
//! passed through to the browser untouched, so they stay `serde_json::Value`.

use serde::{Deserialize, Serialize};

// ============================================================================
// API Envelope
// ============================================================================

/// Uniform `{success, data?, error?}` envelope of the external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Payload of a successful response.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

// ============================================================================
// Auth Models
// ============================================================================

/// OAuth redirect parameters.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoogleAuthRequest<'a> {
    pub code: &'a str,
}

/// Token exchange result.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminGrant {
    pub token: String,
}

// ============================================================================
// User Models
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUsernameRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// `limit`/`offset` query for chat history.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChatQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// Public bot counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStats {
    pub total_servers: u64,
    pub total_users: u64,
    pub total_commands: u64,
}

// ============================================================================
// Admin Models
// ============================================================================

/// Paged, searchable listing query.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistServerRequest {
    pub server_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistUserRequest {
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub range: Option<TimeRange>,
}

/// Analytics window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }
}

fn default_limit() -> u32 {
    50
}
