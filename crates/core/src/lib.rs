//! Domain logic shared across the B2GTHR backend.
//!
//! This crate has no I/O. It defines:
//!
//! - [`mood`] -- the fixed six-level mood scale and its urgency ordering.
//! - [`visibility`] -- the privacy engine deciding which moods a viewer
//!   may see ([`visibility::can_view_mood`]).
//! - [`connection`] -- connection-request state machine and integrity
//!   checks.
//! - [`error`] -- the domain error taxonomy ([`error::CoreError`]).
//! - [`types`] -- shared type aliases.

pub mod connection;
pub mod error;
pub mod mood;
pub mod types;
pub mod visibility;

pub use error::CoreError;
pub use mood::Mood;
