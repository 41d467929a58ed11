//! HTTP server
//!
//! # Endpoints
//!
//! - `/api/prof-access` - access log records (POST only)
//! - `/api/telemetry` - telemetry events (POST only)
//! - `GET /health` - liveness check
//!
//! Non-POST requests to the ingest routes hit a method fallback that answers
//! the plain-text 405 without reading the body, so an oversized body on a
//! wrong verb is still a 405.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use canvaslab_storage::KvStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::endpoint::Endpoint;
use crate::error::IngestError;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn KvStore>,
}

impl AppState {
    /// Create state around a store
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

/// Build the application router
pub fn router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route(
            Endpoint::AccessLog.path(),
            post(prof_access_handler).fallback(method_not_allowed),
        )
        .route(
            Endpoint::Telemetry.path(),
            post(telemetry_handler).fallback(method_not_allowed),
        )
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &ServerConfig, store: Arc<dyn KvStore>) -> std::io::Result<()> {
    let app = router(AppState::new(store), config.cors);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;

    info!(addr = %listener.local_addr()?, cors = config.cors, "Ingest server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Ingest server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Handler for /api/prof-access
async fn prof_access_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<&'static str, IngestError> {
    Endpoint::AccessLog
        .ingest(state.store.as_ref(), &method, &body)
        .await?;
    Ok("OK")
}

/// Handler for /api/telemetry
async fn telemetry_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<&'static str, IngestError> {
    Endpoint::Telemetry
        .ingest(state.store.as_ref(), &method, &body)
        .await?;
    Ok("OK")
}

/// Any verb other than POST on an ingest route
async fn method_not_allowed(method: Method) -> IngestError {
    IngestError::MethodNotAllowed(method)
}

/// Handler for /health
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}
