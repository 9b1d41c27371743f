//! Session request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LoginRequest, LoginResponse, RefreshResponse};
use crate::services::auth;

/// `POST /api/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(
        &state.sessions,
        &body.email,
        &body.password,
        body.expires_in_seconds,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /api/refresh`: exchange the bearer refresh token for an access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<RefreshResponse>> {
    let resp = auth::refresh(&state.sessions, &headers).await?;
    Ok(Json(resp))
}

/// `POST /api/revoke`: revoke the bearer refresh token.
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    auth::revoke(&state.sessions, &headers).await?;
    Ok(StatusCode::NO_CONTENT)
}
