//! Client for the external bot API.
//!
//! Every call resolves to an [`ApiResponse`]; transport and decoding failures
//! are logged and folded into `{ success: false, error }` rather than returned
//! as errors, so handlers can pass the envelope straight to the browser.
//! The Google code exchange is the exception: it returns those failures.

use std::time::Duration;

use reqwest::{header, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::models::{
    AdminGrant, AdminLoginRequest, ApiResponse, AuthGrant, BlacklistServerRequest,
    BlacklistUserRequest, BotStats, GoogleAuthRequest, ListQuery, SendMessageRequest, TimeRange,
    UpdateUsernameRequest,
};

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn builder(&self, method: Method, endpoint: &str, token: Option<&str>) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key);

        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Send a request and decode the envelope, surfacing transport and
    /// decoding failures to the caller.
    async fn try_send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        req: RequestBuilder,
    ) -> Result<ApiResponse<T>, reqwest::Error> {
        let res = req.send().await.inspect_err(|e| {
            tracing::error!(endpoint, error = %e, "API request failed");
        })?;

        let status = res.status();
        let body = res.json::<ApiResponse<T>>().await.inspect_err(|e| {
            tracing::error!(endpoint, status = status.as_u16(), error = %e, "Undecodable API response");
        })?;

        tracing::debug!(endpoint, status = status.as_u16(), success = body.success, "API response");
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, req: RequestBuilder) -> ApiResponse<T> {
        self.try_send(endpoint, req)
            .await
            .unwrap_or_else(|e| ApiResponse::failure(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> ApiResponse<T> {
        self.send(endpoint, self.builder(Method::GET, endpoint, token))
            .await
    }

    async fn get_query<T, Q>(&self, endpoint: &str, query: &Q, token: &str) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.builder(Method::GET, endpoint, Some(token)).query(query);
        self.send(endpoint, req).await
    }

    async fn with_body<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.builder(method, endpoint, token).json(body);
        self.send(endpoint, req).await
    }

    // Auth

    /// The one call whose callers tell an unreachable API apart from a
    /// rejected code, so transport failures come back as `Err`.
    pub async fn google_auth(&self, code: &str) -> Result<ApiResponse<AuthGrant>, reqwest::Error> {
        let endpoint = "/api/auth/google";
        let req = self
            .builder(Method::POST, endpoint, None)
            .json(&GoogleAuthRequest { code });
        self.try_send(endpoint, req).await
    }

    pub async fn current_user(&self, token: &str) -> ApiResponse<Value> {
        self.get("/api/auth/me", Some(token)).await
    }

    pub async fn update_username(&self, token: &str, username: &str) -> ApiResponse<Value> {
        let body = UpdateUsernameRequest {
            username: username.to_string(),
        };
        self.with_body(Method::PUT, "/api/users/username", &body, Some(token))
            .await
    }

    // Chat

    pub async fn chat_messages(&self, token: &str, limit: u32, offset: u32) -> ApiResponse<Value> {
        self.get_query("/api/chat/messages", &[("limit", limit), ("offset", offset)], token)
            .await
    }

    pub async fn send_chat_message(&self, token: &str, message: &str) -> ApiResponse<Value> {
        let body = SendMessageRequest {
            message: message.to_string(),
        };
        self.with_body(Method::POST, "/api/chat/messages", &body, Some(token))
            .await
    }

    // Public

    pub async fn bot_stats(&self) -> ApiResponse<BotStats> {
        self.get("/api/bot/stats", None).await
    }

    // Admin

    pub async fn admin_login(&self, username: &str, password: &str) -> ApiResponse<AdminGrant> {
        let body = AdminLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.with_body(Method::POST, "/api/admin/login", &body, None)
            .await
    }

    pub async fn admin_bot_stats(&self, token: &str) -> ApiResponse<Value> {
        self.get("/api/admin/bot/stats", Some(token)).await
    }

    pub async fn servers(&self, token: &str, page: &ListQuery) -> ApiResponse<Value> {
        self.get_query("/api/admin/servers", &list_params(page), token)
            .await
    }

    pub async fn users(&self, token: &str, page: &ListQuery) -> ApiResponse<Value> {
        self.get_query("/api/admin/users", &list_params(page), token)
            .await
    }

    pub async fn blacklist_server(&self, token: &str, req: &BlacklistServerRequest) -> ApiResponse<Value> {
        self.with_body(Method::POST, "/api/admin/servers/blacklist", req, Some(token))
            .await
    }

    pub async fn blacklist_user(&self, token: &str, req: &BlacklistUserRequest) -> ApiResponse<Value> {
        self.with_body(Method::POST, "/api/admin/users/blacklist", req, Some(token))
            .await
    }

    pub async fn moderation_logs(&self, token: &str, filters: &Value) -> ApiResponse<Value> {
        self.with_body(Method::POST, "/api/admin/moderation/logs", filters, Some(token))
            .await
    }

    pub async fn command_analytics(&self, token: &str) -> ApiResponse<Value> {
        self.get("/api/admin/commands/analytics", Some(token)).await
    }

    pub async fn analytics(&self, token: &str, range: TimeRange) -> ApiResponse<Value> {
        self.get_query("/api/admin/analytics", &[("range", range.as_str())], token)
            .await
    }
}

fn list_params(page: &ListQuery) -> [(&'static str, String); 3] {
    [
        ("limit", page.limit.to_string()),
        ("offset", page.offset.to_string()),
        ("search", page.search.clone()),
    ]
}
