//! Repository for the `shared_boards` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::shared_board::SharedBoard;

const COLUMNS: &str = "id, title, created_by, members, content, version, created_at, updated_at";

/// Provides CRUD operations for two-member shared boards.
pub struct SharedBoardRepo;

impl SharedBoardRepo {
    /// Create a board between `created_by` and `member`.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        created_by: Uuid,
        member: Uuid,
    ) -> Result<SharedBoard, sqlx::Error> {
        let query = format!(
            "INSERT INTO shared_boards (title, created_by, members)
             VALUES ($1, $2, ARRAY[$2, $3])
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SharedBoard>(&query)
            .bind(title)
            .bind(created_by)
            .bind(member)
            .fetch_one(pool)
            .await
    }

    /// Find a board by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SharedBoard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shared_boards WHERE id = $1");
        sqlx::query_as::<_, SharedBoard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the board between two specific users, if any.
    pub async fn find_between(
        pool: &PgPool,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<SharedBoard>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM shared_boards WHERE members @> ARRAY[$1, $2]::uuid[]");
        sqlx::query_as::<_, SharedBoard>(&query)
            .bind(a)
            .bind(b)
            .fetch_optional(pool)
            .await
    }

    /// Boards the user is a member of, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<SharedBoard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shared_boards
             WHERE members @> ARRAY[$1]::uuid[]
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SharedBoard>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Replace board content, bumping the version counter so clients can
    /// detect lost updates.
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        content: &serde_json::Value,
    ) -> Result<Option<SharedBoard>, sqlx::Error> {
        let query = format!(
            "UPDATE shared_boards
             SET content = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SharedBoard>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a board. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shared_boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
