//! Credential hashing, token issuance, and the per-request identity gate.

pub mod password;
pub mod token;

pub use self::token::TokenService;

use crate::api::error::ApiError;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

/// Gate every protected route: resolve the bearer token into a user id.
///
/// No database lookup happens here; identity is trusted from the signature
/// alone. Callers get a ready-to-return 401 when the token is missing or
/// does not verify.
///
/// # Errors
/// Returns `Unauthorized` if the header is absent or the token is invalid.
pub fn require_auth(headers: &HeaderMap, tokens: &TokenService) -> Result<Uuid, ApiError> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(ApiError::Unauthorized("No token supplied".to_string()));
    };

    tokens
        .verify(&token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
