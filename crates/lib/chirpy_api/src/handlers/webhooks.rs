//! Payment provider webhooks.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::models::WebhookEvent;
use crate::services::users;

/// `POST /api/polka/webhooks`: mark users upgraded on `user.upgraded`.
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> AppResult<StatusCode> {
    users::apply_webhook(&*state.store, &event).await?;
    Ok(StatusCode::NO_CONTENT)
}
