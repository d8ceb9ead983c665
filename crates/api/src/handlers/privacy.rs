//! Handlers for the viewer's privacy settings.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use b2gthr_core::visibility::{ConnectionVisibility, GlobalVisibility};
use b2gthr_core::{CoreError, Mood};
use b2gthr_db::models::privacy::PrivacySettingsRow;
use b2gthr_db::repositories::PrivacyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /privacy`. Replaces the settings wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdatePrivacyRequest {
    pub global_visibility: GlobalVisibility,
    /// Mood indices to withhold from connections without a full-visibility
    /// override.
    pub hidden_moods: Vec<i16>,
    /// Per-connection overrides, keyed by connection user id.
    pub connection_settings: HashMap<Uuid, ConnectionVisibility>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/privacy
///
/// Settings are provisioned at sign-up; if the row is somehow missing it is
/// re-provisioned with the defaults rather than answering 404.
pub async fn get_privacy(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<PrivacySettingsRow>>> {
    if let Some(row) = PrivacyRepo::find_by_user(&state.pool, viewer.user_id).await? {
        return Ok(Json(DataResponse::new(row)));
    }

    PrivacyRepo::provision_default(&state.pool, viewer.user_id).await?;
    let row = PrivacyRepo::find_by_user(&state.pool, viewer.user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Privacy provisioning raced".into()))?;
    Ok(Json(DataResponse::new(row)))
}

/// PUT /api/v1/privacy
///
/// Replace the viewer's settings. Every hidden mood index is validated; an
/// out-of-range index rejects the whole write instead of being silently
/// dropped.
pub async fn update_privacy(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<UpdatePrivacyRequest>,
) -> AppResult<Json<DataResponse<PrivacySettingsRow>>> {
    let mut hidden: Vec<i16> = Vec::with_capacity(input.hidden_moods.len());
    for index in input.hidden_moods {
        let mood = Mood::try_from(index).map_err(AppError::Core)?;
        if !hidden.contains(&mood.index()) {
            hidden.push(mood.index());
        }
    }
    hidden.sort_unstable();

    let connection_settings = serde_json::to_value(&input.connection_settings)
        .map_err(|e| AppError::InternalError(format!("Serializing overrides failed: {e}")))?;

    // Ensure there is a row to update; settings may predate provisioning
    // fixes for old accounts.
    PrivacyRepo::provision_default(&state.pool, viewer.user_id).await?;
    let row = PrivacyRepo::update(
        &state.pool,
        viewer.user_id,
        input.global_visibility.as_str(),
        &hidden,
        &connection_settings,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::NotFound {
        entity: "privacy settings",
        id: viewer.user_id,
    }))?;

    tracing::info!(user_id = %viewer.user_id, "Privacy settings updated");
    Ok(Json(DataResponse::new(row)))
}
