//! Hit counter for the static file server.

use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Axum middleware: counts every request that reaches `/app/`.
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    next.run(request).await
}
