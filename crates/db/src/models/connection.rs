//! Connection edge model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Directed "viewer can see subject" edge from the `connections` table.
///
/// Edges always exist in mutual pairs; creation and removal are symmetric.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Connection {
    pub user_id: Uuid,
    pub connection_id: Uuid,
    pub created_at: Timestamp,
}
