//! Readiness probe.

/// `GET /api/healthz`
pub async fn healthz_handler() -> &'static str {
    "OK"
}
