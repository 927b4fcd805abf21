use axum::{routing::get, Router};

use crate::handlers::monitor;
use crate::state::AppState;

/// Mount health check routes (root level, NOT under `/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(monitor::health))
}
