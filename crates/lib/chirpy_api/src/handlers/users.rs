//! User request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{CreateUserRequest, UserResponse};
use crate::services::auth;

/// `POST /api/users`: create a new user account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = auth::register(&state.sessions, &body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
