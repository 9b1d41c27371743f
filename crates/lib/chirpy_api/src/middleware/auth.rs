//! Authentication middleware: Bearer token extraction and JWT verification.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;

/// Authenticated user ID, stored in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = state.sessions.authenticate(request.headers())?;
    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}
