//! Best-effort account purge across all tables.

use sqlx::PgPool;
use uuid::Uuid;

/// Result of a cascading purge: the tables whose delete failed.
///
/// Partial failure does not abort the purge or block sign-out; the caller
/// decides how to surface it.
#[derive(Debug, Default)]
pub struct PurgeOutcome {
    pub failed_tables: Vec<&'static str>,
}

impl PurgeOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed_tables.is_empty()
    }
}

/// Deletes everything a user owns, table by table.
pub struct AccountRepo;

impl AccountRepo {
    /// Delete the user's data from every table, finishing with the profile
    /// row itself.
    ///
    /// Each table is attempted independently; a failure is logged and
    /// recorded but does not stop the remaining deletes.
    pub async fn purge_user(pool: &PgPool, user_id: Uuid) -> PurgeOutcome {
        let statements: &[(&'static str, &'static str)] = &[
            (
                "shared_boards",
                "DELETE FROM shared_boards WHERE members @> ARRAY[$1]::uuid[]",
            ),
            (
                "connection_requests",
                "DELETE FROM connection_requests WHERE sender_id = $1 OR recipient_id = $1",
            ),
            (
                "connections",
                "DELETE FROM connections WHERE user_id = $1 OR connection_id = $1",
            ),
            ("groups", "DELETE FROM groups WHERE user_id = $1"),
            (
                "privacy_settings",
                "DELETE FROM privacy_settings WHERE user_id = $1",
            ),
            (
                "password_reset_tokens",
                "DELETE FROM password_reset_tokens WHERE user_id = $1",
            ),
            ("sessions", "DELETE FROM sessions WHERE user_id = $1"),
            ("profiles", "DELETE FROM profiles WHERE id = $1"),
        ];

        let mut outcome = PurgeOutcome::default();
        for (table, sql) in statements {
            if let Err(e) = sqlx::query(sql).bind(user_id).execute(pool).await {
                tracing::error!(user_id = %user_id, table, error = %e, "Account purge step failed");
                outcome.failed_tables.push(table);
            }
        }
        outcome
    }
}
