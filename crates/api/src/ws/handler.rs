use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use b2gthr_core::visibility::{can_view_mood, PrivacySettings};
use b2gthr_core::{CoreError, Mood};
use b2gthr_db::repositories::{PrivacyRepo, ProfileRepo};
use b2gthr_sync::{MoodSynchronizer, Roster, RosterEntry, SyncUpdate};

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::gate::DbVisibilityGate;

/// Query parameters for the upgrade request.
///
/// Browsers cannot set an `Authorization` header on a WebSocket handshake,
/// so the access token travels as a query parameter instead.
#[derive(Debug, Deserialize)]
pub struct WsAuthParams {
    pub token: String,
}

/// HTTP handler that authenticates and upgrades the connection.
///
/// After the upgrade the connection is registered with `WsManager` and a
/// dedicated mood synchronizer task is spawned for the viewer.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsAuthParams>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let claims = validate_token(&params.token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;
    let viewer = claims.sub;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, viewer)))
}

/// Manage a single authenticated WebSocket connection after upgrade.
///
///   1. Registers the connection with `WsManager`.
///   2. Seeds the viewer's roster from the persisted connection list,
///      visibility-filtered.
///   3. Spawns the viewer's mood synchronizer on the change feed and a
///      forwarder that turns its updates into JSON frames.
///   4. Processes inbound messages on the current task.
///   5. On disconnect, cancels the synchronizer: the dropped feed receiver
///      is the unsubscribe, and the roster goes with the task.
async fn handle_socket(socket: WebSocket, state: AppState, viewer: Uuid) {
    let conn_id = Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = %viewer, "WebSocket connected");

    let (sender, mut rx) = state.ws_manager.add(conn_id.clone(), viewer).await;

    let roster = match seed_roster(&state, viewer).await {
        Ok(roster) => roster,
        Err(e) => {
            tracing::error!(conn_id = %conn_id, user_id = %viewer, error = %e, "Roster seed failed, closing socket");
            state.ws_manager.remove(&conn_id).await;
            let mut socket = socket;
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    // Synchronizer task: owns the roster, reconciles the change feed.
    let gate = Arc::new(DbVisibilityGate::new(state.pool.clone()));
    let (updates_tx, mut updates_rx) = mpsc::channel::<SyncUpdate>(64);
    let cancel = CancellationToken::new();
    let synchronizer = MoodSynchronizer::new(viewer, roster, gate, updates_tx);
    let sync_task = tokio::spawn(synchronizer.run(state.feed.subscribe(), cancel.clone()));

    // Forwarder task: serialize synchronizer updates into text frames.
    let forward_sender = sender.clone();
    let forward_conn_id = conn_id.clone();
    let forward_task = tokio::spawn(async move {
        while let Some(update) = updates_rx.recv().await {
            match serde_json::to_string(&update) {
                Ok(json) => {
                    if forward_sender.send(Message::Text(json.into())).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(conn_id = %forward_conn_id, error = %e, "Failed to serialize sync update");
                }
            }
        }
    });

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {
                // The sync stream is server-push only; inbound text is
                // ignored.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: tear down the synchronizer before the tasks.
    cancel.cancel();
    state.ws_manager.remove(&conn_id).await;
    let _ = sync_task.await;
    forward_task.abort();
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id = %viewer, "WebSocket disconnected");
}

/// Build the viewer's initial roster from the persisted connection list.
///
/// Every row is visibility-checked before seeding: a withheld mood is
/// seeded as the neutral placeholder with no context, so the real value
/// never crosses the boundary even in the first snapshot.
async fn seed_roster(state: &AppState, viewer: Uuid) -> Result<Roster, sqlx::Error> {
    let rows = ProfileRepo::list_connection_profiles(&state.pool, viewer).await?;

    let mut roster = Roster::new();
    for row in rows {
        let Some(mood) = Mood::from_index(row.mood) else {
            tracing::warn!(subject = %row.connection_id, mood = row.mood, "Skipping connection with invalid stored mood");
            continue;
        };

        let settings = match PrivacyRepo::find_by_user(&state.pool, row.connection_id).await? {
            Some(stored) => stored.to_domain(),
            None => PrivacySettings::default_for_new_user(),
        };
        let visible = can_view_mood(viewer, row.connection_id, mood, &settings, true);

        let entry = if visible {
            RosterEntry {
                full_name: row.full_name,
                avatar_url: row.avatar_url,
                mood,
                context: row.context,
                last_updated: row.last_updated,
                shared_board_id: row.shared_board_id,
            }
        } else {
            RosterEntry {
                full_name: row.full_name,
                avatar_url: row.avatar_url,
                mood: Mood::MildNeutral,
                context: None,
                last_updated: row.last_updated,
                shared_board_id: row.shared_board_id,
            }
        };
        roster.seed(row.connection_id, entry);
    }
    Ok(roster)
}
