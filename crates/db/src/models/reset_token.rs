//! Password reset token entity model.

use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Row from the `password_reset_tokens` table. Single-use: `used_at` is set
/// when the token is consumed.
#[derive(Debug, Clone, FromRow)]
pub struct ResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
