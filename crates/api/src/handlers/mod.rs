pub mod beer;
pub mod monitor;
