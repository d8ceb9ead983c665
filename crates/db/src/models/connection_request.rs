//! Connection request entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Row from the `connection_requests` table.
///
/// `status` is one of `pending` / `accepted` / `declined`; transitions are
/// validated through `b2gthr_core::connection::RequestStatus`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub status: String,
    pub created_at: Timestamp,
}
