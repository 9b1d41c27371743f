//! Bearer credential extraction from request headers.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use super::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Strip the `Bearer ` prefix from an authorization value.
///
/// The prefix is optional: a bare value is returned unchanged. An empty value
/// is treated as a missing header.
pub fn strip_bearer(value: &str) -> Result<&str, AuthError> {
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }
    Ok(value.strip_prefix(BEARER_PREFIX).unwrap_or(value))
}

/// Extract the bearer credential from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;
    strip_bearer(value)
}
