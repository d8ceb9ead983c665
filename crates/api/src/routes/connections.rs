//! Route definitions for connections and connection requests.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::connections;
use crate::state::AppState;

/// Routes mounted at `/connections`.
///
/// ```text
/// GET    /                        -> list_connections
/// DELETE /{id}                    -> remove_connection
/// POST   /requests                -> send_request
/// GET    /requests/incoming       -> list_incoming_requests
/// GET    /requests/outgoing       -> list_outgoing_requests
/// POST   /requests/{id}/accept    -> accept_request
/// POST   /requests/{id}/decline   -> decline_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(connections::list_connections))
        .route("/{id}", delete(connections::remove_connection))
        .route("/requests", post(connections::send_request))
        .route("/requests/incoming", get(connections::list_incoming_requests))
        .route("/requests/outgoing", get(connections::list_outgoing_requests))
        .route("/requests/{id}/accept", post(connections::accept_request))
        .route("/requests/{id}/decline", post(connections::decline_request))
}
