//! Repository for the `password_reset_tokens` table.

use sqlx::PgPool;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Provides issue/consume operations for single-use reset tokens.
pub struct ResetTokenRepo;

impl ResetTokenRepo {
    /// Store the hash of a newly issued token.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically consume a valid token, returning its user id.
    ///
    /// The `used_at IS NULL` guard makes the token single-use even under
    /// concurrent attempts; expired or already-used tokens return `None`.
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(user_id,)| user_id))
    }
}
