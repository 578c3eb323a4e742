//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS (any origin, method, header)
//! - Tracing middleware
//! - Upload size limit
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::MySqlPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assets::AssetStore;
use crate::routes;
use crate::state::AppState;

/// Default request body limit, sized for image uploads
pub const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    pub bind_addr: SocketAddr,

    /// Maximum request body size in bytes
    pub upload_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::description::router())
        .merge(routes::desa::router())
        .merge(routes::blogs::router())
        .merge(routes::uploads::router(state.assets()))
        .layer(DefaultBodyLimit::max(config.upload_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// The pool is expected to come from [`crate::db::bootstrap`], so the
/// schema exists before the first request.
///
/// # Example
///
/// ```ignore
/// let pool = bootstrap(&DbConfig::from_env()?).await?;
/// run_server(pool, AssetStore::new("uploads"), ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: MySqlPool,
    assets: AssetStore,
    config: ServerConfig,
) -> Result<(), ServerError> {
    assets.ensure_dirs().await?;
    tracing::info!(uploads = %assets.root().display(), "Asset directories ready");

    let app = build_router(AppState::new(pool, assets), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
