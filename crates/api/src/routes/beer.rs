//! Route definitions for the `/v1/beers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::beer;
use crate::state::AppState;

/// Routes for beers.
///
/// ```text
/// GET    /v1/beers            -> list        (?page=&limit=)
/// POST   /v1/beers            -> create      (multipart)
/// GET    /v1/beers/filter     -> filter_by_name (?name=)
/// GET    /v1/beers/{id}       -> get_by_id
/// PUT    /v1/beers/{id}       -> update      (multipart)
/// DELETE /v1/beers/{id}       -> delete
/// ```
///
/// The static `/filter` segment takes priority over `{id}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/beers", get(beer::list).post(beer::create))
        .route("/v1/beers/", get(beer::list).post(beer::create))
        .route("/v1/beers/filter", get(beer::filter_by_name))
        .route(
            "/v1/beers/{id}",
            get(beer::get_by_id).put(beer::update).delete(beer::delete),
        )
}
