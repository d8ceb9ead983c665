//! Repository for the `connections` table.

use sqlx::PgPool;
use uuid::Uuid;

/// Provides operations on mutual connection edges.
pub struct ConnectionRepo;

impl ConnectionRepo {
    /// Create both directed edges between two users in one transaction.
    ///
    /// Called when a connection request is accepted; after it commits,
    /// exactly the pair (a→b, b→a) exists. Re-inserting an existing edge is
    /// a no-op.
    pub async fn create_mutual(pool: &PgPool, a: Uuid, b: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT INTO connections (user_id, connection_id)
             VALUES ($1, $2), ($2, $1)
             ON CONFLICT (user_id, connection_id) DO NOTHING",
        )
        .bind(a)
        .bind(b)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    /// Remove both directed edges between two users. Either party may call
    /// this; deletion is symmetric.
    pub async fn remove_mutual(pool: &PgPool, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM connections
             WHERE (user_id = $1 AND connection_id = $2)
                OR (user_id = $2 AND connection_id = $1)",
        )
        .bind(a)
        .bind(b)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a directed edge `viewer → subject` exists.
    pub async fn edge_exists(
        pool: &PgPool,
        viewer: Uuid,
        subject: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM connections WHERE user_id = $1 AND connection_id = $2
             )",
        )
        .bind(viewer)
        .bind(subject)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }
}
