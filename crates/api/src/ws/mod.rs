//! WebSocket infrastructure for realtime mood synchronization.
//!
//! Provides connection management, heartbeat monitoring, the
//! database-backed visibility gate, and the HTTP upgrade handler used by
//! Axum routes.

pub mod gate;
mod handler;
mod heartbeat;
pub mod manager;

pub use gate::DbVisibilityGate;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
