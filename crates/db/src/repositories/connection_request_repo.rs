//! Repository for the `connection_requests` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::connection_request::ConnectionRequest;

const COLUMNS: &str = "id, sender_id, recipient_id, status, created_at";

/// Provides CRUD operations for connection requests.
pub struct ConnectionRequestRepo;

impl ConnectionRequestRepo {
    /// Insert a new pending request.
    pub async fn create(
        pool: &PgPool,
        sender_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<ConnectionRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO connection_requests (sender_id, recipient_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConnectionRequest>(&query)
            .bind(sender_id)
            .bind(recipient_id)
            .fetch_one(pool)
            .await
    }

    /// Find a request by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ConnectionRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM connection_requests WHERE id = $1");
        sqlx::query_as::<_, ConnectionRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a pending request exists between two users, in either
    /// direction.
    pub async fn pending_exists_between(
        pool: &PgPool,
        a: Uuid,
        b: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM connection_requests
                WHERE status = 'pending'
                  AND ((sender_id = $1 AND recipient_id = $2)
                    OR (sender_id = $2 AND recipient_id = $1))
             )",
        )
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Pending requests addressed to the given user, newest first.
    pub async fn list_incoming(
        pool: &PgPool,
        recipient_id: Uuid,
    ) -> Result<Vec<ConnectionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connection_requests
             WHERE recipient_id = $1 AND status = 'pending'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ConnectionRequest>(&query)
            .bind(recipient_id)
            .fetch_all(pool)
            .await
    }

    /// Pending requests sent by the given user, newest first.
    pub async fn list_outgoing(
        pool: &PgPool,
        sender_id: Uuid,
    ) -> Result<Vec<ConnectionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connection_requests
             WHERE sender_id = $1 AND status = 'pending'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ConnectionRequest>(&query)
            .bind(sender_id)
            .fetch_all(pool)
            .await
    }

    /// Move a pending request to a terminal status.
    ///
    /// The `status = 'pending'` guard makes the transition race-safe: a
    /// request that was already resolved returns `None`.
    pub async fn resolve(
        pool: &PgPool,
        id: Uuid,
        status: &str,
    ) -> Result<Option<ConnectionRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE connection_requests SET status = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConnectionRequest>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
