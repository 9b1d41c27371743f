//! Authentication service: account and session flows delegating to `chirpy_core::auth`.

use axum::http::HeaderMap;
use chirpy_core::auth::bearer::bearer_token;
use chirpy_core::auth::session::SessionService;
use tracing::info;

use crate::error::AppResult;
use crate::models::{LoginResponse, RefreshResponse, UserResponse};

/// Register a new user account.
pub async fn register(
    sessions: &SessionService,
    email: &str,
    password: &str,
) -> AppResult<UserResponse> {
    let user = sessions.register(email, password).await?;
    Ok(user.into())
}

/// Authenticate with email + password.
pub async fn login(
    sessions: &SessionService,
    email: &str,
    password: &str,
    expires_in_seconds: Option<i64>,
) -> AppResult<LoginResponse> {
    let session = sessions.login(email, password, expires_in_seconds).await?;
    Ok(session.into())
}

/// Exchange the bearer refresh token for a new access token.
pub async fn refresh(sessions: &SessionService, headers: &HeaderMap) -> AppResult<RefreshResponse> {
    let refresh_token = bearer_token(headers)?;
    let token = sessions.refresh(refresh_token).await?;
    Ok(RefreshResponse { token })
}

/// Revoke the bearer refresh token.
pub async fn revoke(sessions: &SessionService, headers: &HeaderMap) -> AppResult<()> {
    let refresh_token = bearer_token(headers)?;
    sessions.revoke(refresh_token).await?;
    info!("refresh token revoked");
    Ok(())
}
