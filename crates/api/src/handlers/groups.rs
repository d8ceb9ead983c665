//! Handlers for groups and group members.
//!
//! Groups are a private organizational tool: only the owner can see or
//! modify a group, so a non-owner gets 404 rather than 403 to avoid leaking
//! that the group exists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use b2gthr_core::{CoreError, Mood};
use b2gthr_db::models::group::{
    CreateGroup, CreateGroupMember, Group, GroupMember, UpdateGroupMember,
};
use b2gthr_db::repositories::GroupRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A group with its member list, as returned by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<GroupMember>,
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<CreateGroup>,
) -> AppResult<(StatusCode, Json<DataResponse<Group>>)> {
    validate_name(&input.name)?;
    let group = GroupRepo::create(&state.pool, viewer.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(group))))
}

/// GET /api/v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Group>>>> {
    let groups = GroupRepo::list_for_user(&state.pool, viewer.user_id).await?;
    Ok(Json(DataResponse::new(groups)))
}

/// GET /api/v1/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<GroupDetail>>> {
    let group = owned_group(&state, &viewer, group_id).await?;
    let members = GroupRepo::list_members(&state.pool, group_id).await?;
    Ok(Json(DataResponse::new(GroupDetail { group, members })))
}

/// PATCH /api/v1/groups/{id}
pub async fn rename_group(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(input): Json<CreateGroup>,
) -> AppResult<Json<DataResponse<Group>>> {
    validate_name(&input.name)?;
    owned_group(&state, &viewer, group_id).await?;

    let group = GroupRepo::rename(&state.pool, group_id, &input.name)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "group",
            id: group_id,
        }))?;
    Ok(Json(DataResponse::new(group)))
}

/// DELETE /api/v1/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(group_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    owned_group(&state, &viewer, group_id).await?;
    GroupRepo::delete(&state.pool, group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// POST /api/v1/groups/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(input): Json<CreateGroupMember>,
) -> AppResult<(StatusCode, Json<DataResponse<GroupMember>>)> {
    validate_name(&input.name)?;
    validate_member_mood(input.mood)?;
    owned_group(&state, &viewer, group_id).await?;

    let member = GroupRepo::add_member(&state.pool, group_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(member))))
}

/// PATCH /api/v1/groups/{group_id}/members/{member_id}
pub async fn update_member(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path((group_id, member_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateGroupMember>,
) -> AppResult<Json<DataResponse<GroupMember>>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    validate_member_mood(input.mood)?;
    owned_group(&state, &viewer, group_id).await?;

    let member = GroupRepo::update_member(&state.pool, group_id, member_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "group member",
            id: member_id,
        }))?;
    Ok(Json(DataResponse::new(member)))
}

/// DELETE /api/v1/groups/{group_id}/members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path((group_id, member_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    owned_group(&state, &viewer, group_id).await?;

    let removed = GroupRepo::remove_member(&state.pool, group_id, member_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "group member",
            id: member_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a group and require the viewer to own it.
async fn owned_group(
    state: &AppState,
    viewer: &AuthUser,
    group_id: Uuid,
) -> Result<Group, AppError> {
    let group = GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "group",
            id: group_id,
        }))?;

    if group.user_id != viewer.user_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "group",
            id: group_id,
        }));
    }
    Ok(group)
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name must not be empty".into(),
        )));
    }
    Ok(())
}

/// Cached member moods use the same 0..=5 scale as profiles.
fn validate_member_mood(mood: Option<i16>) -> Result<(), AppError> {
    if let Some(index) = mood {
        Mood::try_from(index).map_err(AppError::Core)?;
    }
    Ok(())
}
