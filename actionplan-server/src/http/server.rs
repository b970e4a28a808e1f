//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS (all origins)
//! - Tracing middleware
//! - Graceful shutdown on Ctrl+C

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::{ConfigError, ServerConfig};
use crate::db::QueryGateway;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn QueryGateway>,
}

impl AppState {
    pub fn new(gateway: impl QueryGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Build the application router with every `/api` route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until Ctrl+C.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(PgGateway::new(pool));
/// run_server(state, &ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: &ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);
    tracing::info!(
        "Health check: http://localhost:{}/api/health",
        config.bind_addr.port()
    );

    serve_until(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_until<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for an interrupt (Ctrl+C / SIGINT).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, starting shutdown"),
        Err(e) => {
            // without a handler the server can only be killed
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
