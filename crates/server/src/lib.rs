//! HTTP boundary for Coursemate.
//!
//! Routes:
//! - `POST /api/query`: answer a question, creating a session when needed
//! - `GET /api/courses`: course count and titles
//! - `GET /health`: liveness probe
//!
//! When a frontend directory is configured, every other path is served
//! from it.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use crate::handlers::{courses_handler, health_handler, query_handler};
use axum::{
    routing::{get, post},
    Router,
};
use coursemate_core::{AppError, AppResult, ServerConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(state: Arc<AppState>, frontend_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/query", post(query_handler))
        .route("/api/courses", get(courses_handler))
        .route("/health", get(health_handler));

    let app = match frontend_dir {
        Some(dir) => {
            tracing::info!(frontend = %dir.display(), "Serving frontend");
            api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => api,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
    .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> AppResult<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            AppError::Config(format!(
                "Invalid server address {}:{}: {}",
                config.host, config.port, e
            ))
        })?;

    let app = router(state, config.frontend_dir.as_deref());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
