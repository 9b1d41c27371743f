//! Authentication and session credentials.
//!
//! Provides password hashing, access-token (JWT) minting and verification,
//! refresh-token generation, bearer extraction, and the session service that
//! ties them to the user and refresh-token stores.

pub mod bearer;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod session;

use thiserror::Error;

use crate::store::StoreError;

/// Authentication errors.
///
/// The HTTP layer collapses the credential variants into one generic
/// response; the precise variant is only logged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Malformed password hash")]
    MalformedHash,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
