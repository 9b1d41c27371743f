//! Chirp service: validation, censorship and storage.

use chirpy_core::chirps::validate_chirp;
use chirpy_core::store::ChirpStore;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ChirpResponse, ValidateChirpResponse};

/// Validate and censor a body without storing it.
pub fn validate(body: &str) -> AppResult<ValidateChirpResponse> {
    let cleaned_body = validate_chirp(body)?;
    Ok(ValidateChirpResponse { cleaned_body })
}

/// Validate, censor and store a chirp for `user_id`.
pub async fn create(store: &dyn ChirpStore, user_id: Uuid, body: &str) -> AppResult<ChirpResponse> {
    let cleaned = validate_chirp(body)?;
    let chirp = store.create_chirp(&cleaned, user_id).await?;
    info!(chirp_id = %chirp.id, %user_id, "chirp created");
    Ok(chirp.into())
}

/// All chirps, oldest first.
pub async fn list(store: &dyn ChirpStore) -> AppResult<Vec<ChirpResponse>> {
    let chirps = store.list_chirps().await?;
    Ok(chirps.into_iter().map(ChirpResponse::from).collect())
}

/// Look up one chirp by its path parameter.
pub async fn get(store: &dyn ChirpStore, raw_id: &str) -> AppResult<ChirpResponse> {
    let chirp_id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::Validation("Invalid chirp ID".into()))?;
    store
        .get_chirp(chirp_id)
        .await?
        .map(ChirpResponse::from)
        .ok_or_else(|| AppError::NotFound("Chirp not found".into()))
}
