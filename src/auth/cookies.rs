//! Session cookie names, lookup and Set-Cookie construction.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};

use crate::error::AppError;

pub const USER_COOKIE: &str = "quantumx_token";
pub const ADMIN_COOKIE: &str = "quantumx_admin_token";

/// Value of the first cookie named `name` across all `Cookie` headers.
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Session cookie carrying `token` for `max_age_secs`.
pub fn session_cookie(name: &str, token: &str, max_age_secs: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_secs as i64))
        .build()
}

/// Expired cookie that makes the browser drop `name`.
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name.to_string(), ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}

/// Append `cookie` as a `Set-Cookie` header.
pub fn append_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) -> Result<(), AppError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(format!("Invalid cookie header: {}", e)))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}
