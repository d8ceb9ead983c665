//! Route definitions for the viewer's own profile.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET   /me       -> get_me
/// PATCH /me       -> update_me
/// PUT   /me/mood  -> update_mood
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(profile::get_me).patch(profile::update_me))
        .route("/me/mood", put(profile::update_mood))
}
