//! Route access gate.
//!
//! Pure decision over a request path and the two session cookie values.
//! The axum wiring lives in [`super::middleware::access_gate`].

use super::token::try_decode;
use percent_encoding::percent_decode_str;

/// Protected path prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePaths {
    pub user_prefix: String,
    pub admin_prefix: String,
}

impl Default for GatePaths {
    fn default() -> Self {
        GatePaths {
            user_prefix: "/dashboard".to_string(),
            admin_prefix: "/admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Public,
    User,
    Admin,
}

/// Why a protected request was turned away. Never surfaced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("session cookie missing")]
    MissingToken,

    #[error("session token malformed")]
    MalformedToken,

    #[error("administrator flag not set")]
    NotAdmin,

    #[error("request path does not resolve")]
    UnresolvablePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forward,
    Redirect(GateError),
}

impl Decision {
    pub fn is_forward(&self) -> bool {
        matches!(self, Decision::Forward)
    }
}

/// Resolve a raw request path the way the static file service does:
/// percent-decoded, with a decoded `/` acting as a separator and empty or `.`
/// segments dropped. `None` when the path is not UTF-8 or contains `..`.
pub fn normalize_path(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;

    let mut normalized = String::with_capacity(decoded.len());
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            segment => {
                normalized.push('/');
                normalized.push_str(segment);
            }
        }
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    Some(normalized)
}

/// `path` equals `prefix` or continues it with a new segment.
fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl GatePaths {
    pub fn classify(&self, path: &str) -> Zone {
        if under_prefix(path, &self.admin_prefix) {
            Zone::Admin
        } else if under_prefix(path, &self.user_prefix) {
            Zone::User
        } else {
            Zone::Public
        }
    }

    /// Decide whether a request for `path` may proceed.
    pub fn evaluate(
        &self,
        path: &str,
        user_token: Option<&str>,
        admin_token: Option<&str>,
    ) -> Decision {
        let result = match self.classify(path) {
            Zone::Public => Ok(()),
            Zone::User => check_user(user_token),
            Zone::Admin => check_admin(admin_token),
        };

        match result {
            Ok(()) => Decision::Forward,
            Err(e) => Decision::Redirect(e),
        }
    }

    /// [`evaluate`](Self::evaluate) for a path exactly as it arrived on the
    /// wire. Paths that do not normalize are turned away.
    pub fn evaluate_request(
        &self,
        raw_path: &str,
        user_token: Option<&str>,
        admin_token: Option<&str>,
    ) -> Decision {
        match normalize_path(raw_path) {
            Some(path) => self.evaluate(&path, user_token, admin_token),
            None => Decision::Redirect(GateError::UnresolvablePath),
        }
    }
}

fn present(token: Option<&str>) -> Result<&str, GateError> {
    token
        .filter(|t| !t.is_empty())
        .ok_or(GateError::MissingToken)
}

fn check_user(token: Option<&str>) -> Result<(), GateError> {
    let token = present(token)?;
    try_decode(token).map_err(|_| GateError::MalformedToken)?;
    Ok(())
}

fn check_admin(token: Option<&str>) -> Result<(), GateError> {
    let token = present(token)?;
    let claims = try_decode(token).map_err(|_| GateError::MalformedToken)?;
    if !claims.is_admin() {
        return Err(GateError::NotAdmin);
    }
    Ok(())
}
