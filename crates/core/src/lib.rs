//! Domain logic for the beer catalog.
//!
//! Everything here is independent of the database and the HTTP layer:
//! the error taxonomy, pagination arithmetic, field validation and the
//! on-disk image lifecycle.

pub mod beer;
pub mod error;
pub mod image_store;
pub mod paging;
pub mod types;
