//! Group and group-member entity models and DTOs.

use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Row from the `groups` table. Owned by `user_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: Timestamp,
}

/// Row from the `group_members` table.
///
/// Members carry their own cached name/mood/avatar and are not necessarily
/// real profiles.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub mood: Option<i16>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroup {
    pub name: String,
}

/// DTO for adding a member to a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupMember {
    pub name: String,
    pub mood: Option<i16>,
    pub avatar_url: Option<String>,
}

/// DTO for patching a member. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateGroupMember {
    pub name: Option<String>,
    pub mood: Option<i16>,
    pub avatar_url: Option<String>,
}
