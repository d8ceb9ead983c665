//! Database-backed visibility gate for the mood synchronizer.

use async_trait::async_trait;
use uuid::Uuid;

use b2gthr_core::visibility::{can_view_mood, PrivacySettings};
use b2gthr_core::Mood;
use b2gthr_db::repositories::{ConnectionRepo, PrivacyRepo};
use b2gthr_db::DbPool;
use b2gthr_sync::VisibilityGate;

/// Answers visibility questions from the live connection graph and the
/// subject's stored privacy settings.
///
/// Fail-closed at every step: a database error denies, a missing privacy
/// row gets the provisioned defaults rather than open access.
pub struct DbVisibilityGate {
    pool: DbPool,
}

impl DbVisibilityGate {
    pub fn new(pool: DbPool) -> DbVisibilityGate {
        DbVisibilityGate { pool }
    }
}

#[async_trait]
impl VisibilityGate for DbVisibilityGate {
    async fn can_view(&self, viewer: Uuid, subject: Uuid, mood: Mood) -> bool {
        let edge = match ConnectionRepo::edge_exists(&self.pool, viewer, subject).await {
            Ok(edge) => edge,
            Err(e) => {
                tracing::error!(viewer = %viewer, subject = %subject, error = %e, "Edge lookup failed, denying visibility");
                return false;
            }
        };
        if !edge {
            return false;
        }

        let settings = match PrivacyRepo::find_by_user(&self.pool, subject).await {
            Ok(Some(row)) => row.to_domain(),
            Ok(None) => PrivacySettings::default_for_new_user(),
            Err(e) => {
                tracing::error!(viewer = %viewer, subject = %subject, error = %e, "Privacy lookup failed, denying visibility");
                return false;
            }
        };

        can_view_mood(viewer, subject, mood, &settings, true)
    }
}
