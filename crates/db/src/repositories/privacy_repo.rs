//! Repository for the `privacy_settings` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::privacy::PrivacySettingsRow;

const COLUMNS: &str = "user_id, global_visibility, hidden_moods, connection_settings, updated_at";

/// Provides reads and writes for per-user privacy configuration.
pub struct PrivacyRepo;

impl PrivacyRepo {
    /// Provision the default settings for a new user.
    ///
    /// Idempotent: an existing row is left untouched.
    pub async fn provision_default(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO privacy_settings (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Fetch a user's settings.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<PrivacySettingsRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM privacy_settings WHERE user_id = $1");
        sqlx::query_as::<_, PrivacySettingsRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's settings wholesale.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        global_visibility: &str,
        hidden_moods: &[i16],
        connection_settings: &serde_json::Value,
    ) -> Result<Option<PrivacySettingsRow>, sqlx::Error> {
        let query = format!(
            "UPDATE privacy_settings SET
                global_visibility = $2,
                hidden_moods = $3,
                connection_settings = $4,
                updated_at = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PrivacySettingsRow>(&query)
            .bind(user_id)
            .bind(global_visibility)
            .bind(hidden_moods)
            .bind(connection_settings)
            .fetch_optional(pool)
            .await
    }
}
