//! Beer catalog API server library.
//!
//! Exposes the building blocks (config, state, error handling, usecases,
//! handlers, routes, server loop) so integration tests and the binary
//! entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;
pub mod usecases;
