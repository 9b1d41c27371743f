//! Opaque refresh token generation.

use rand::TryRngCore;
use rand::rngs::OsRng;

use super::AuthError;

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 60;

/// Bytes of randomness per token (hex-encoded to twice as many chars).
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a refresh token: 32 bytes from the OS random source, hex-encoded.
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut key = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| AuthError::RandomSource(e.to_string()))?;
    Ok(hex::encode(key))
}
