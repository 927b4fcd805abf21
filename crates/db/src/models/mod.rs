//! Domain model structs and DTOs.
//!
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) for partial edits

pub mod beer;
