//! Session entity model.

use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Row from the `sessions` table.
///
/// Only the SHA-256 hash of the refresh token is stored; the token itself
/// never touches the database.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
