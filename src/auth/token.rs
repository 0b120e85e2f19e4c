//! Session token payload decoding.
//!
//! Tokens are dot-delimited `header.payload.signature` strings issued by the
//! external API. Only the payload is read. The signature is NOT verified, so
//! the claims are whatever the client presented.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde_json::{Map, Value};

/// Standard alphabet with optional padding. URL-safe input is mapped onto it first.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claim carrying the administrator flag.
pub const ADMIN_CLAIM: &str = "isAdmin";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("expected at least 3 segments, got {0}")]
    SegmentCount(usize),

    #[error("empty payload segment")]
    EmptyPayload,

    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("payload is not UTF-8")]
    Utf8,

    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True only when `isAdmin` is the JSON boolean `true`.
    pub fn is_admin(&self) -> bool {
        matches!(self.0.get(ADMIN_CLAIM), Some(Value::Bool(true)))
    }

    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }
}

/// Decode the payload segment of `token`.
pub fn try_decode(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() < 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let payload = segments[1];
    if payload.is_empty() {
        return Err(TokenError::EmptyPayload);
    }

    let normalized: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(normalized)
        .map_err(|e| TokenError::Base64(e.to_string()))?;

    let text = std::str::from_utf8(&bytes).map_err(|_| TokenError::Utf8)?;

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(Claims(map)),
        Ok(_) => Err(TokenError::NotAnObject),
        Err(e) => Err(TokenError::Json(e.to_string())),
    }
}

/// Decode the payload segment of `token`, `None` on any failure.
pub fn decode_token(token: &str) -> Option<Claims> {
    try_decode(token).ok()
}
