//! Chirp request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChirpRequest, ChirpResponse, ValidateChirpResponse};
use crate::services::chirps;

/// `POST /api/validate_chirp`: check length and censor without storing.
pub async fn validate_chirp_handler(
    Json(body): Json<ChirpRequest>,
) -> AppResult<Json<ValidateChirpResponse>> {
    Ok(Json(chirps::validate(&body.body)?))
}

/// `POST /api/chirps`: post a chirp as the authenticated user.
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<ChirpRequest>,
) -> AppResult<(StatusCode, Json<ChirpResponse>)> {
    let chirp = chirps::create(&*state.store, user.0, &body.body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// `GET /api/chirps`
pub async fn list_chirps_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ChirpResponse>>> {
    Ok(Json(chirps::list(&*state.store).await?))
}

/// `GET /api/chirps/{chirp_id}`
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> AppResult<Json<ChirpResponse>> {
    Ok(Json(chirps::get(&*state.store, &chirp_id).await?))
}
