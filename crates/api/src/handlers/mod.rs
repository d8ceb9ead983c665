//! Request handlers, one module per resource.

pub mod account;
pub mod auth;
pub mod boards;
pub mod connections;
pub mod groups;
pub mod privacy;
pub mod profile;
