//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod connection;
pub mod connection_request;
pub mod group;
pub mod privacy;
pub mod profile;
pub mod reset_token;
pub mod session;
pub mod shared_board;
