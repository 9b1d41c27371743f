//! Chirpy HTTP server binary.
//!
//! Runs against PostgreSQL when a database URL is configured, otherwise on the
//! in-memory store (state is lost on exit).

use std::path::PathBuf;
use std::sync::Arc;

use chirpy_api::config::{ApiConfig, DEFAULT_HOST, DEFAULT_PORT, resolve_jwt_secret};
use chirpy_core::store::Store;
use chirpy_core::store::memory::MemoryStore;
use chirpy_core::store::postgres::PgStore;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "chirpy_server", about = "Chirpy HTTP server")]
struct Args {
    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// PostgreSQL connection URL. Without it the in-memory store is used.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Deployment platform; `dev` enables `POST /admin/reset`.
    #[arg(long, env = "PLATFORM", default_value = "production")]
    platform: String,

    /// Directory served under `/app/`.
    #[arg(long, env = "FILEPATH_ROOT", default_value = ".")]
    filepath_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chirpy_api=debug,chirpy_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    info!(
        version = chirpy_core::version(),
        port = args.port,
        platform = %args.platform,
        "starting chirpy_server"
    );

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        database_url: args.database_url.filter(|url| !url.is_empty()),
        platform: args.platform,
        filepath_root: args.filepath_root,
        jwt_secret: resolve_jwt_secret(),
    };

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(url)
                .await?;

            info!("running database migrations");
            chirpy_core::migrate::migrate(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("no DATABASE_URL configured, using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = chirpy_api::AppState::new(store, config.clone());
    let app = chirpy_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(
        addr = %local_addr,
        root = %config.filepath_root.display(),
        "REST API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
