//! Route definitions for shared boards.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::boards;
use crate::state::AppState;

/// Routes mounted at `/boards`.
///
/// ```text
/// GET    /              -> list_boards
/// POST   /              -> create_board
/// GET    /{id}          -> get_board
/// DELETE /{id}          -> delete_board (creator only)
/// PUT    /{id}/content  -> update_board_content
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(boards::list_boards).post(boards::create_board))
        .route("/{id}", get(boards::get_board).delete(boards::delete_board))
        .route("/{id}/content", put(boards::update_board_content))
}
