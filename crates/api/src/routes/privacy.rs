//! Route definitions for the viewer's privacy settings.

use axum::routing::get;
use axum::Router;

use crate::handlers::privacy;
use crate::state::AppState;

/// Routes mounted at `/privacy`.
///
/// ```text
/// GET /  -> get_privacy
/// PUT /  -> update_privacy
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(privacy::get_privacy).put(privacy::update_privacy))
}
