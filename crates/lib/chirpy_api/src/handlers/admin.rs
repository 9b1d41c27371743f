//! Admin endpoints: hit metrics and the dev-only reset.

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use crate::AppState;
use crate::error::AppResult;
use crate::services::users;

/// `GET /admin/metrics`: static file hit count.
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    let hits = state.hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {hits} times!</p>\n  </body>\n</html>\n"
    ))
}

/// `POST /admin/reset`: delete all users and zero the hit counter (dev only).
pub async fn reset_handler(State(state): State<AppState>) -> AppResult<StatusCode> {
    users::reset(&*state.store, state.config.is_dev()).await?;
    state.hits.store(0, Ordering::Relaxed);
    Ok(StatusCode::OK)
}
