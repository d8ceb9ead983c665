//! Route definitions for groups and group members.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::groups;
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET    /                                 -> list_groups
/// POST   /                                 -> create_group
/// GET    /{id}                             -> get_group
/// PATCH  /{id}                             -> rename_group
/// DELETE /{id}                             -> delete_group
/// POST   /{id}/members                     -> add_member
/// PATCH  /{group_id}/members/{member_id}   -> update_member
/// DELETE /{group_id}/members/{member_id}   -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list_groups).post(groups::create_group))
        .route(
            "/{id}",
            get(groups::get_group)
                .patch(groups::rename_group)
                .delete(groups::delete_group),
        )
        .route("/{id}/members", post(groups::add_member))
        .route(
            "/{group_id}/members/{member_id}",
            axum::routing::patch(groups::update_member).delete(groups::remove_member),
        )
}
