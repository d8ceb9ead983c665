//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and opaque-token
//!   helpers shared by refresh and password-reset flows.

pub mod jwt;
pub mod password;
