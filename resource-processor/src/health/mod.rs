//! Health check endpoint.
//!
//! Serves `GET /health`, reporting whether the Kafka client can reach a broker.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::IngestError;

/// A blocking connectivity probe.
pub trait HealthCheck: Send + Sync + 'static {
    fn is_healthy(&self) -> bool;
}

/// Build the health router.
pub fn create_app(check: Arc<dyn HealthCheck>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(check)
}

/// Serve the health router on `addr` until the process exits.
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), IngestError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| IngestError::health(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| IngestError::health(e.to_string()))
}

async fn health_check(State(check): State<Arc<dyn HealthCheck>>) -> (StatusCode, Json<Value>) {
    let healthy = tokio::task::spawn_blocking(move || check.is_healthy())
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Health check task failed");
            false
        });

    if healthy {
        (StatusCode::OK, Json(json!({ "checksRun": 1 })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "checksRun": 1, "error": "Kafka brokers are not connected" })),
        )
    }
}
