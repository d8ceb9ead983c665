//! Profile entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;

/// Full profile row from the `profiles` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`ProfileResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub password_hash: String,
    pub mood: i16,
    pub context: Option<String>,
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
}

/// Safe profile representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub mood: i16,
    pub context: Option<String>,
    pub last_updated: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> ProfileResponse {
        ProfileResponse {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            avatar_url: p.avatar_url,
            mood: p.mood,
            context: p.context,
            last_updated: p.last_updated,
        }
    }
}

/// DTO for creating a new profile at sign-up.
#[derive(Debug, Deserialize)]
pub struct CreateProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

/// DTO for patching profile display fields.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// One connection's profile as read for the roster seed: the connection
/// edge joined with the subject's profile row and any shared board between
/// the two users.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionProfile {
    pub connection_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub mood: i16,
    pub context: Option<String>,
    pub last_updated: Timestamp,
    pub shared_board_id: Option<Uuid>,
}
