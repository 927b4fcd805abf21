//! Repository layer.
//!
//! Each repository is an async trait with a single PostgreSQL-backed
//! implementation holding the pool, so the usecase layer can be driven by
//! an in-memory double in tests.

pub mod beer_repo;

pub use beer_repo::{BeerRepo, BeerRepository};
