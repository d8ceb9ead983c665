//! B2GTHR change-feed infrastructure.
//!
//! - [`ChangeEvent`] -- the closed tagged-union of row-level change events
//!   delivered to mood synchronizers.
//! - [`ChangeFeed`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; the API layer publishes one event per
//!   committed profile write, in commit order.

pub mod bus;
pub mod change;

pub use bus::ChangeFeed;
pub use change::{ChangeEvent, ProfileChange};
