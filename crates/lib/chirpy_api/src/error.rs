//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_core::auth::AuthError;
use chirpy_core::chirps::ChirpError;
use chirpy_core::store::StoreError;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Internal(detail) => {
                error!(%detail, "responding with 500");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Validation(msg),
            StoreError::DbError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingHeader => {
                AppError::Unauthorized("Missing authorization header".into())
            }
            AuthError::InvalidSignature | AuthError::TokenExpired | AuthError::MalformedToken(_) => {
                debug!(cause = %e, "access token rejected");
                AppError::Unauthorized("Invalid or expired token".into())
            }
            // Unknown email and wrong password look the same to the caller.
            AuthError::UserNotFound | AuthError::InvalidCredentials | AuthError::PasswordMismatch => {
                debug!(cause = %e, "login rejected");
                AppError::Unauthorized("Invalid credentials".into())
            }
            AuthError::InvalidRefreshToken => {
                AppError::Unauthorized("Invalid refresh token".into())
            }
            AuthError::EmailTaken => AppError::Validation("Email already registered".into()),
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::MalformedHash => AppError::Internal("stored password hash is malformed".into()),
            AuthError::RandomSource(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::from(e),
        }
    }
}

impl From<ChirpError> for AppError {
    fn from(e: ChirpError) -> Self {
        match e {
            ChirpError::TooLong => AppError::Validation(e.to_string()),
        }
    }
}
