//! Usecase layer between the HTTP handlers and the repositories.

pub mod beer;

pub use beer::{BeerService, BeerUsecase};
