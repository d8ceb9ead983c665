//! Handlers for the viewer's own profile, including the mood write path.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use b2gthr_core::{CoreError, Mood};
use b2gthr_db::models::profile::{Profile, ProfileResponse, UpdateProfile};
use b2gthr_db::repositories::ProfileRepo;
use b2gthr_events::{ChangeEvent, ProfileChange};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of the optional mood context blurb.
const MAX_CONTEXT_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /profiles/me/mood`.
#[derive(Debug, Deserialize)]
pub struct UpdateMoodRequest {
    /// Mood index, 0 (deeply serene) through 5 (urgent).
    pub mood: i16,
    /// Optional short note shown alongside the mood.
    pub context: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/profiles/me
pub async fn get_me(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, viewer.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "profile",
            id: viewer.user_id,
        }))?;

    Ok(Json(DataResponse::new(profile.into())))
}

/// PATCH /api/v1/profiles/me
///
/// Update display fields. Publishes an update on the change feed so
/// connected rosters pick up the new name or avatar.
pub async fn update_me(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    if let Some(name) = &input.full_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Display name must not be empty".into(),
            )));
        }
    }

    let old = ProfileRepo::find_by_id(&state.pool, viewer.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "profile",
            id: viewer.user_id,
        }))?;

    let new = ProfileRepo::update(&state.pool, viewer.user_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "profile",
            id: viewer.user_id,
        }))?;

    state.feed.publish(ChangeEvent::Update {
        old: to_profile_change(&old)?,
        new: to_profile_change(&new)?,
    });

    Ok(Json(DataResponse::new(new.into())))
}

/// PUT /api/v1/profiles/me/mood
///
/// The single mood write path. Validates the mood index, persists it with a
/// fresh `last_updated` stamp, then publishes the update on the change feed
/// for every connected synchronizer to reconcile.
pub async fn update_mood(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<UpdateMoodRequest>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    // 1. Validate before touching the database.
    let mood = Mood::try_from(input.mood).map_err(AppError::Core)?;
    if let Some(context) = &input.context {
        if context.chars().count() > MAX_CONTEXT_LEN {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Context must be at most {MAX_CONTEXT_LEN} characters"
            ))));
        }
    }

    // 2. Capture the prior row so the feed event carries old + new.
    let old = ProfileRepo::find_by_id(&state.pool, viewer.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "profile",
            id: viewer.user_id,
        }))?;

    // 3. Persist.
    let new = ProfileRepo::update_mood(
        &state.pool,
        viewer.user_id,
        mood.index(),
        input.context.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::NotFound {
        entity: "profile",
        id: viewer.user_id,
    }))?;

    // 4. Publish. Subscribers apply their own visibility gate; nothing is
    //    disclosed here.
    state.feed.publish(ChangeEvent::Update {
        old: to_profile_change(&old)?,
        new: to_profile_change(&new)?,
    });

    tracing::debug!(user_id = %viewer.user_id, mood = %mood.name(), "Mood updated");
    Ok(Json(DataResponse::new(new.into())))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a profile row to its change-feed representation.
///
/// The mood column carries a CHECK constraint, so an out-of-range value here
/// means the row is corrupt and the event must not be published.
pub fn to_profile_change(p: &Profile) -> Result<ProfileChange, AppError> {
    let mood = Mood::try_from(p.mood).map_err(|_| {
        AppError::InternalError(format!("Profile {} has invalid mood {}", p.id, p.mood))
    })?;
    Ok(ProfileChange {
        subject_id: p.id,
        full_name: p.full_name.clone(),
        avatar_url: p.avatar_url.clone(),
        mood,
        context: p.context.clone(),
        updated_at: p.last_updated,
    })
}
