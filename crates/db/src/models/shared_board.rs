//! Shared board entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Row from the `shared_boards` table.
///
/// A board is a collaboration space between exactly two members (the
/// creator and one connection). `content` is an opaque JSON blob; `version`
/// increments on every content write so clients can detect lost updates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SharedBoard {
    pub id: Uuid,
    pub title: String,
    pub created_by: Uuid,
    pub members: Vec<Uuid>,
    pub content: serde_json::Value,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a board from a connection.
#[derive(Debug, Deserialize)]
pub struct CreateSharedBoard {
    pub title: String,
    /// The connection the board is shared with.
    pub member_id: Uuid,
}

/// DTO for replacing board content.
#[derive(Debug, Deserialize)]
pub struct UpdateBoardContent {
    pub content: serde_json::Value,
}
