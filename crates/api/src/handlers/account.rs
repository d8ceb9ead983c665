//! Account deletion handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use b2gthr_core::CoreError;
use b2gthr_db::repositories::{AccountRepo, ProfileRepo};
use b2gthr_events::ChangeEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::to_profile_change;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of an account deletion.
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    /// `false` when one or more tables could not be purged; the failures
    /// are listed so the client can surface them.
    pub complete: bool,
    pub failed_tables: Vec<&'static str>,
}

/// DELETE /api/v1/account
///
/// Purge everything the viewer owns, table by table. The purge is
/// best-effort: a partial failure is reported but never blocks sign-out,
/// and the viewer's sessions and sockets are torn down either way.
pub async fn delete_account(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<DeleteAccountResponse>>> {
    // Capture the profile first so the delete event can carry it.
    let profile = ProfileRepo::find_by_id(&state.pool, viewer.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "profile",
            id: viewer.user_id,
        }))?;
    let change = to_profile_change(&profile)?;

    let outcome = AccountRepo::purge_user(&state.pool, viewer.user_id).await;

    // Every roster tracking this user drops them on the delete event.
    state.feed.publish(ChangeEvent::Delete { old: change });
    state.ws_manager.disconnect_user(viewer.user_id).await;

    if outcome.is_complete() {
        tracing::info!(user_id = %viewer.user_id, "Account deleted");
    } else {
        tracing::warn!(
            user_id = %viewer.user_id,
            failed_tables = ?outcome.failed_tables,
            "Account deletion incomplete"
        );
    }

    Ok(Json(DataResponse::new(DeleteAccountResponse {
        complete: outcome.is_complete(),
        failed_tables: outcome.failed_tables,
    })))
}
