//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::Router;
use axum::routing::{get, get_service, post};
use chirpy_core::auth::session::{AuthConfig, SessionService};
use chirpy_core::store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, chirps, health, users, webhooks};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Users, chirps and refresh tokens.
    pub store: Arc<dyn Store>,
    /// Login/refresh/revoke over `store`.
    pub sessions: SessionService,
    /// API configuration.
    pub config: ApiConfig,
    /// Requests served under `/app/` since start or the last reset.
    pub hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        let sessions = SessionService::new(
            store.clone(),
            store.clone(),
            AuthConfig::new(config.jwt_secret.clone()),
        );
        Self {
            store,
            sessions,
            config,
            hits: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/healthz", get(health::healthz_handler))
        .route("/api/validate_chirp", post(chirps::validate_chirp_handler))
        .route("/api/users", post(users::create_user_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route("/api/chirps", get(chirps::list_chirps_handler))
        .route("/api/chirps/{chirp_id}", get(chirps::get_chirp_handler))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler))
        .route("/admin/metrics", get(admin::metrics_handler))
        .route("/admin/reset", post(admin::reset_handler));

    // Protected routes (require an access token)
    let protected = Router::new()
        .route("/api/chirps", post(chirps::create_chirp_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Static files; only GET (and HEAD) requests count for /admin/metrics
    let app = Router::new().nest_service(
        "/app",
        get_service(ServeDir::new(&state.config.filepath_root)).route_layer(
            axum::middleware::from_fn_with_state(state.clone(), middleware::metrics::count_hits),
        ),
    );

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(app)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
