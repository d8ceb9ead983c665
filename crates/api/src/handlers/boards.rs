//! Handlers for two-member shared boards.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use b2gthr_core::CoreError;
use b2gthr_db::models::shared_board::{CreateSharedBoard, SharedBoard, UpdateBoardContent};
use b2gthr_db::repositories::{ConnectionRepo, SharedBoardRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/boards
///
/// Create a board shared with one existing connection. At most one board
/// exists per pair; the roster join relies on that.
pub async fn create_board(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<CreateSharedBoard>,
) -> AppResult<(StatusCode, Json<DataResponse<SharedBoard>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Board title must not be empty".into(),
        )));
    }
    if input.member_id == viewer.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot share a board with yourself".into(),
        )));
    }

    if !ConnectionRepo::edge_exists(&state.pool, viewer.user_id, input.member_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only share a board with one of your connections".into(),
        )));
    }

    if SharedBoardRepo::find_between(&state.pool, viewer.user_id, input.member_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A shared board with this connection already exists".into(),
        )));
    }

    let board =
        SharedBoardRepo::create(&state.pool, &input.title, viewer.user_id, input.member_id)
            .await?;

    tracing::info!(board_id = %board.id, creator = %viewer.user_id, "Shared board created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(board))))
}

/// GET /api/v1/boards
pub async fn list_boards(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SharedBoard>>>> {
    let boards = SharedBoardRepo::list_for_user(&state.pool, viewer.user_id).await?;
    Ok(Json(DataResponse::new(boards)))
}

/// GET /api/v1/boards/{id}
pub async fn get_board(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(board_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<SharedBoard>>> {
    let board = member_board(&state, &viewer, board_id).await?;
    Ok(Json(DataResponse::new(board)))
}

/// PUT /api/v1/boards/{id}/content
///
/// Replace the board content. The returned `version` is bumped on every
/// write so a client holding a stale copy can detect the lost update.
pub async fn update_board_content(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(board_id): Path<Uuid>,
    Json(input): Json<UpdateBoardContent>,
) -> AppResult<Json<DataResponse<SharedBoard>>> {
    member_board(&state, &viewer, board_id).await?;

    let board = SharedBoardRepo::update_content(&state.pool, board_id, &input.content)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "shared board",
            id: board_id,
        }))?;
    Ok(Json(DataResponse::new(board)))
}

/// DELETE /api/v1/boards/{id}
///
/// Only the creator may delete a board.
pub async fn delete_board(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(board_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let board = member_board(&state, &viewer, board_id).await?;
    if board.created_by != viewer.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the board's creator may delete it".into(),
        )));
    }

    SharedBoardRepo::delete(&state.pool, board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a board and require the viewer to be one of its two members.
/// Non-members get 404 to avoid leaking the board's existence.
async fn member_board(
    state: &AppState,
    viewer: &AuthUser,
    board_id: Uuid,
) -> Result<SharedBoard, AppError> {
    let board = SharedBoardRepo::find_by_id(&state.pool, board_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "shared board",
            id: board_id,
        }))?;

    if !board.members.contains(&viewer.user_id) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "shared board",
            id: board_id,
        }));
    }
    Ok(board)
}
