//! Shared response envelope types for API handlers.

use beerleo_core::paging::PagingResult;
use beerleo_core::types::DbId;
use serde::Serialize;

/// `{ "data": [...], "paging": {...} }` envelope for paged lists.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub paging: PagingResult,
}

/// `{ "message": ... }` acknowledgement for writes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }

    pub fn with_id(message: &'static str, id: DbId) -> Self {
        Self {
            message,
            id: Some(id),
        }
    }
}
