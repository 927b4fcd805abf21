pub mod beer;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers::monitor;
use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /v1, /v1/                    service name and version
///
/// /v1/beers, /v1/beers/        list (?page=&limit=), create (multipart)
/// /v1/beers/filter             filter by name (?name=)
/// /v1/beers/{id}               get, update (multipart), delete
/// ```
///
/// Paths are registered flat rather than nested so both the bare and the
/// trailing-slash forms resolve.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/v1", get(monitor::info))
        .route("/v1/", get(monitor::info))
        .merge(beer::router())
}
