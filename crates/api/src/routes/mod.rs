pub mod account;
pub mod auth;
pub mod boards;
pub mod connections;
pub mod groups;
pub mod health;
pub mod privacy;
pub mod profile;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// The mood-sync WebSocket (`/api/v1/ws`) is mounted separately via
/// [`ws_routes`].
///
/// ```text
/// /auth/signup                             create account (public)
/// /auth/login                              login (public)
/// /auth/refresh                            rotate tokens (public)
/// /auth/logout                             logout (requires auth)
/// /auth/forgot-password                    issue reset token (public)
/// /auth/reset-password                     consume reset token (public)
///
/// /profiles/me                             get, patch own profile
/// /profiles/me/mood                        set mood + context (PUT)
///
/// /connections                             list (visibility-filtered)
/// /connections/{id}                        remove mutual connection (DELETE)
/// /connections/requests                    send request (POST)
/// /connections/requests/incoming           pending requests received
/// /connections/requests/outgoing           pending requests sent
/// /connections/requests/{id}/accept        accept (recipient only)
/// /connections/requests/{id}/decline       decline (recipient only)
///
/// /privacy                                 get, put own privacy settings
///
/// /groups                                  list, create
/// /groups/{id}                             get, rename, delete
/// /groups/{id}/members                     add member (POST)
/// /groups/{group_id}/members/{member_id}   patch, remove member
///
/// /boards                                  list, create
/// /boards/{id}                             get, delete
/// /boards/{id}/content                     replace content (PUT)
///
/// /account                                 delete account (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and session lifecycle.
        .nest("/auth", auth::router())
        // The viewer's own profile and mood.
        .nest("/profiles", profile::router())
        // Connections and connection requests.
        .nest("/connections", connections::router())
        // Privacy settings.
        .nest("/privacy", privacy::router())
        // Private organizational groups.
        .nest("/groups", groups::router())
        // Two-member shared boards.
        .nest("/boards", boards::router())
        // Account deletion.
        .nest("/account", account::router())
}

/// The realtime mood-sync WebSocket, mounted separately from the REST tree:
/// the socket outlives any request deadline, so the router keeps it outside
/// the request-timeout layer.
pub fn ws_routes() -> Router<AppState> {
    Router::new().route("/api/v1/ws", get(ws::ws_handler))
}
