//! Handlers for connections and connection requests.
//!
//! The connections listing is a read-path disclosure surface: every row is
//! passed through the privacy engine before it leaves the server, exactly
//! like the realtime feed. A denied mood is replaced with the neutral
//! placeholder, never echoed back redacted-in-name-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use b2gthr_core::connection::{validate_new_request, RequestStatus};
use b2gthr_core::types::Timestamp;
use b2gthr_core::visibility::can_view_mood;
use b2gthr_core::{CoreError, Mood};
use b2gthr_db::models::connection_request::ConnectionRequest;
use b2gthr_db::repositories::{
    ConnectionRepo, ConnectionRequestRepo, PrivacyRepo, ProfileRepo,
};
use b2gthr_events::ChangeEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::to_profile_change;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /connections/requests`.
#[derive(Debug, Deserialize)]
pub struct SendRequestBody {
    pub recipient_id: Uuid,
}

/// One connection as seen by the viewer, post-privacy-check.
#[derive(Debug, Serialize)]
pub struct ConnectionView {
    pub connection_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    /// The subject's mood index, or the neutral placeholder when withheld.
    pub mood: i16,
    pub context: Option<String>,
    pub last_updated: Timestamp,
    pub shared_board_id: Option<Uuid>,
    /// `false` when the mood shown is the placeholder, not the real value.
    pub mood_visible: bool,
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

/// GET /api/v1/connections
///
/// List the viewer's connections with each subject's mood filtered through
/// the privacy engine.
pub async fn list_connections(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ConnectionView>>>> {
    let rows = ProfileRepo::list_connection_profiles(&state.pool, viewer.user_id).await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let mood = Mood::from_index(row.mood).unwrap_or(Mood::MildNeutral);
        let settings = match PrivacyRepo::find_by_user(&state.pool, row.connection_id).await? {
            Some(stored) => stored.to_domain(),
            // Provisioning guarantees a row; a missing one gets the
            // provisioned defaults rather than open access.
            None => b2gthr_core::visibility::PrivacySettings::default_for_new_user(),
        };

        // The row came off the viewer's own edge list, so the edge exists.
        let visible = can_view_mood(viewer.user_id, row.connection_id, mood, &settings, true);

        views.push(if visible {
            ConnectionView {
                connection_id: row.connection_id,
                full_name: row.full_name,
                avatar_url: row.avatar_url,
                mood: mood.index(),
                context: row.context,
                last_updated: row.last_updated,
                shared_board_id: row.shared_board_id,
                mood_visible: true,
            }
        } else {
            ConnectionView {
                connection_id: row.connection_id,
                full_name: row.full_name,
                avatar_url: row.avatar_url,
                mood: Mood::MildNeutral.index(),
                context: None,
                last_updated: row.last_updated,
                shared_board_id: row.shared_board_id,
                mood_visible: false,
            }
        });
    }

    Ok(Json(DataResponse::new(views)))
}

/// DELETE /api/v1/connections/{id}
///
/// Remove the mutual connection with the given user. Symmetric: either
/// party may remove it, and both directed edges go together.
pub async fn remove_connection(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(other_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let removed = ConnectionRepo::remove_mutual(&state.pool, viewer.user_id, other_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "connection",
            id: other_id,
        }));
    }

    tracing::info!(user_id = %viewer.user_id, other = %other_id, "Connection removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Connection requests
// ---------------------------------------------------------------------------

/// POST /api/v1/connections/requests
pub async fn send_request(
    State(state): State<AppState>,
    viewer: AuthUser,
    Json(input): Json<SendRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<ConnectionRequest>>)> {
    validate_new_request(viewer.user_id, input.recipient_id).map_err(AppError::Core)?;

    if ProfileRepo::find_by_id(&state.pool, input.recipient_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "profile",
            id: input.recipient_id,
        }));
    }

    if ConnectionRepo::edge_exists(&state.pool, viewer.user_id, input.recipient_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You are already connected with this user".into(),
        )));
    }

    if ConnectionRequestRepo::pending_exists_between(
        &state.pool,
        viewer.user_id,
        input.recipient_id,
    )
    .await?
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A connection request between you and this user is already pending".into(),
        )));
    }

    let request =
        ConnectionRequestRepo::create(&state.pool, viewer.user_id, input.recipient_id).await?;

    tracing::info!(
        request_id = %request.id,
        sender = %viewer.user_id,
        recipient = %input.recipient_id,
        "Connection request sent"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(request))))
}

/// GET /api/v1/connections/requests/incoming
pub async fn list_incoming_requests(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ConnectionRequest>>>> {
    let requests = ConnectionRequestRepo::list_incoming(&state.pool, viewer.user_id).await?;
    Ok(Json(DataResponse::new(requests)))
}

/// GET /api/v1/connections/requests/outgoing
pub async fn list_outgoing_requests(
    State(state): State<AppState>,
    viewer: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ConnectionRequest>>>> {
    let requests = ConnectionRequestRepo::list_outgoing(&state.pool, viewer.user_id).await?;
    Ok(Json(DataResponse::new(requests)))
}

/// POST /api/v1/connections/requests/{id}/accept
///
/// Only the recipient may accept. On success both directed edges exist and
/// both parties' live rosters are told about each other via insert events.
pub async fn accept_request(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ConnectionRequest>>> {
    let resolved = resolve_request(&state, &viewer, request_id, RequestStatus::Accepted).await?;

    ConnectionRepo::create_mutual(&state.pool, resolved.sender_id, resolved.recipient_id)
        .await?;

    // Announce both profiles on the feed. Each synchronizer's visibility
    // gate requires an edge, so only the two new connections (and anyone
    // already connected, who ignores a duplicate insert) react.
    for user_id in [resolved.sender_id, resolved.recipient_id] {
        if let Some(profile) = ProfileRepo::find_by_id(&state.pool, user_id).await? {
            state.feed.publish(ChangeEvent::Insert {
                new: to_profile_change(&profile)?,
            });
        }
    }

    tracing::info!(
        request_id = %resolved.id,
        sender = %resolved.sender_id,
        recipient = %resolved.recipient_id,
        "Connection request accepted"
    );
    Ok(Json(DataResponse::new(resolved)))
}

/// POST /api/v1/connections/requests/{id}/decline
///
/// Only the recipient may decline. Declining creates no edges; a declined
/// request is terminal and can never be re-resolved.
pub async fn decline_request(
    State(state): State<AppState>,
    viewer: AuthUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ConnectionRequest>>> {
    let resolved = resolve_request(&state, &viewer, request_id, RequestStatus::Declined).await?;

    tracing::info!(
        request_id = %resolved.id,
        sender = %resolved.sender_id,
        recipient = %resolved.recipient_id,
        "Connection request declined"
    );
    Ok(Json(DataResponse::new(resolved)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shared accept/decline path: authorization, legality of the transition,
/// and the race-safe status update.
async fn resolve_request(
    state: &AppState,
    viewer: &AuthUser,
    request_id: Uuid,
    target: RequestStatus,
) -> Result<ConnectionRequest, AppError> {
    let request = ConnectionRequestRepo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "connection request",
            id: request_id,
        }))?;

    if request.recipient_id != viewer.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the recipient may resolve a connection request".into(),
        )));
    }

    let current = RequestStatus::from_str(&request.status).ok_or_else(|| {
        AppError::InternalError(format!(
            "Connection request {} has invalid status '{}'",
            request.id, request.status
        ))
    })?;
    current.transition_to(target).map_err(AppError::Core)?;

    // The repository re-checks `status = 'pending'`, so a concurrent resolve
    // loses cleanly instead of double-applying.
    ConnectionRequestRepo::resolve(&state.pool, request_id, target.as_str())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This connection request was already resolved".into(),
            ))
        })
}
