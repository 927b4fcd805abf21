//! Service identity and health handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// `GET /v1/` payload.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Configured application version.
    pub version: String,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET /v1/ -- configured application name and version.
pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let app = state.config.app();
    Json(ServiceInfo {
        name: app.name().to_string(),
        version: app.version().to_string(),
    })
}

/// GET /health -- service and database health. Always 200.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.beers.health_check().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: state.config.app().version().to_string(),
        db_healthy,
    })
}
