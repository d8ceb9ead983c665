//! Repository for the `profiles` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{ConnectionProfile, CreateProfile, Profile, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, full_name, avatar_url, password_hash, mood, context, \
                       last_updated, created_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    ///
    /// Idempotent by id: re-provisioning an existing profile is a no-op that
    /// returns `None` and never overwrites the stored mood or fields.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, email, full_name, password_hash)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by email (case-insensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Patch display fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                avatar_url = COALESCE($3, avatar_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Set the user's current mood and context, stamping `last_updated`.
    ///
    /// This is the single mood write path: only the subject writes their own
    /// mood row.
    pub async fn update_mood(
        pool: &PgPool,
        id: Uuid,
        mood: i16,
        context: Option<&str>,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET mood = $2, context = $3, last_updated = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(mood)
            .bind(context)
            .fetch_optional(pool)
            .await
    }

    /// Update the stored password hash. Returns `true` if the row existed.
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read the viewer's connections joined with each subject's profile and
    /// any shared board between the pair. Used to seed the roster.
    pub async fn list_connection_profiles(
        pool: &PgPool,
        viewer: Uuid,
    ) -> Result<Vec<ConnectionProfile>, sqlx::Error> {
        sqlx::query_as::<_, ConnectionProfile>(
            "SELECT c.connection_id,
                    p.full_name,
                    p.avatar_url,
                    p.mood,
                    p.context,
                    p.last_updated,
                    sb.id AS shared_board_id
             FROM connections c
             JOIN profiles p ON p.id = c.connection_id
             LEFT JOIN shared_boards sb
                    ON sb.members @> ARRAY[c.user_id, c.connection_id]
             WHERE c.user_id = $1
             ORDER BY c.created_at",
        )
        .bind(viewer)
        .fetch_all(pool)
        .await
    }
}
