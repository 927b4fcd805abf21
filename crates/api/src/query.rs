//! Query parameter types for API handlers.
//!
//! Values are kept as raw strings so malformed numbers can be reported with
//! a specific message instead of the generic extractor rejection.

use serde::Deserialize;

/// Pagination parameters (`?page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Name filter parameters (`?name=`).
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub name: Option<String>,
}
