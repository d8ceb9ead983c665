//! Per-viewer mood synchronizer task.
//!
//! [`MoodSynchronizer::run`] consumes the profile change feed, checks every
//! event against a [`VisibilityGate`] before it can reach the roster, and
//! emits [`SyncUpdate`]s to its owner (the viewer's WebSocket session).
//! Cancelling the token tears the task down and drops the feed receiver,
//! which is the unsubscribe.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;
use b2gthr_core::Mood;
use b2gthr_events::ChangeEvent;

use crate::roster::{Roster, RosterEntry};

// ---------------------------------------------------------------------------
// Visibility gate
// ---------------------------------------------------------------------------

/// Decides whether a viewer may observe a subject's mood.
///
/// The production implementation looks up the connection edge and the
/// subject's privacy settings; tests substitute a static gate.
#[async_trait]
pub trait VisibilityGate: Send + Sync {
    async fn can_view(&self, viewer: Uuid, subject: Uuid, mood: Mood) -> bool;
}

// ---------------------------------------------------------------------------
// Updates pushed to the owner
// ---------------------------------------------------------------------------

/// One connection in a roster snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotEntry {
    pub subject_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub mood: Mood,
    pub context: Option<String>,
    pub last_updated: Timestamp,
    pub shared_board_id: Option<Uuid>,
}

/// Messages the synchronizer pushes to its owner.
///
/// Serialized as JSON with an internally-tagged `"type"` discriminator so
/// the client can route frames by type string.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncUpdate {
    /// Full roster in display order, emitted after every applied event.
    Snapshot { connections: Vec<SnapshotEntry> },
    /// A connection just entered the urgent state.
    Urgent { subject_id: Uuid, full_name: String },
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Owns one viewer's roster and keeps it consistent with the change feed.
///
/// The roster is owned exclusively by this task; nothing else mutates it.
pub struct MoodSynchronizer {
    viewer: Uuid,
    roster: Roster,
    gate: Arc<dyn VisibilityGate>,
    updates: mpsc::Sender<SyncUpdate>,
}

impl MoodSynchronizer {
    /// Create a synchronizer for `viewer`, starting from a pre-seeded
    /// roster (the visibility-filtered initial connection list).
    pub fn new(
        viewer: Uuid,
        roster: Roster,
        gate: Arc<dyn VisibilityGate>,
        updates: mpsc::Sender<SyncUpdate>,
    ) -> MoodSynchronizer {
        MoodSynchronizer { viewer, roster, gate, updates }
    }

    /// Run the event loop until the feed closes, the owner goes away, or
    /// `cancel` fires.
    pub async fn run(
        mut self,
        mut feed: broadcast::Receiver<ChangeEvent>,
        cancel: CancellationToken,
    ) {
        // Initial snapshot so the owner renders the seeded roster at once.
        if self.send_snapshot().await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(viewer = %self.viewer, "Mood synchronizer cancelled");
                    break;
                }
                result = feed.recv() => match result {
                    Ok(event) => {
                        if self.handle_event(event).await.is_err() {
                            // Owner dropped the update receiver.
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(viewer = %self.viewer, skipped = n, "Mood synchronizer lagged behind the change feed");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(viewer = %self.viewer, "Change feed closed, mood synchronizer shutting down");
                        break;
                    }
                },
            }
        }
    }

    /// Gate, apply, and publish one event.
    ///
    /// Returns `Err` only when the owner's update channel is closed.
    async fn handle_event(&mut self, event: ChangeEvent) -> Result<(), ()> {
        let subject = event.subject_id();

        // The roster tracks connections, not the viewer themselves.
        if subject == self.viewer {
            return Ok(());
        }

        // Visibility is enforced before the event can touch the roster.
        // Deletes pass through: removing data discloses nothing.
        if let Some(mood) = disclosed_mood(&event) {
            if !self.gate.can_view(self.viewer, subject, mood).await {
                tracing::debug!(viewer = %self.viewer, subject = %subject, "Change event dropped by visibility gate");
                return Ok(());
            }
        }

        let Some(applied) = self.roster.apply(&event) else {
            return Ok(());
        };

        if applied.urgent_entered {
            let full_name = self
                .roster
                .get(subject)
                .map(|e| e.full_name.clone())
                .unwrap_or_default();
            self.send(SyncUpdate::Urgent { subject_id: subject, full_name })
                .await?;
        }
        self.send_snapshot().await
    }

    async fn send_snapshot(&self) -> Result<(), ()> {
        let connections = self
            .roster
            .ordered_entries()
            .into_iter()
            .map(|(subject_id, entry)| snapshot_entry(subject_id, entry))
            .collect();
        self.send(SyncUpdate::Snapshot { connections }).await
    }

    async fn send(&self, update: SyncUpdate) -> Result<(), ()> {
        self.updates.send(update).await.map_err(|_| ())
    }
}

/// The mood an event would disclose, or `None` for deletes.
fn disclosed_mood(event: &ChangeEvent) -> Option<Mood> {
    match event {
        ChangeEvent::Insert { new } => Some(new.mood),
        ChangeEvent::Update { new, .. } => Some(new.mood),
        ChangeEvent::Delete { .. } => None,
    }
}

fn snapshot_entry(subject_id: Uuid, entry: &RosterEntry) -> SnapshotEntry {
    SnapshotEntry {
        subject_id,
        full_name: entry.full_name.clone(),
        avatar_url: entry.avatar_url.clone(),
        mood: entry.mood,
        context: entry.context.clone(),
        last_updated: entry.last_updated,
        shared_board_id: entry.shared_board_id,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;

    use b2gthr_events::{ChangeFeed, ProfileChange};

    use super::*;

    /// Gate that allows everything.
    struct AllowAll;

    #[async_trait]
    impl VisibilityGate for AllowAll {
        async fn can_view(&self, _viewer: Uuid, _subject: Uuid, _mood: Mood) -> bool {
            true
        }
    }

    /// Gate that denies a fixed set of subjects.
    struct DenySubjects(HashSet<Uuid>);

    #[async_trait]
    impl VisibilityGate for DenySubjects {
        async fn can_view(&self, _viewer: Uuid, subject: Uuid, _mood: Mood) -> bool {
            !self.0.contains(&subject)
        }
    }

    fn change(subject_id: Uuid, name: &str, mood: Mood, context: Option<&str>) -> ProfileChange {
        ProfileChange {
            subject_id,
            full_name: name.into(),
            avatar_url: None,
            mood,
            context: context.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    struct Harness {
        feed: ChangeFeed,
        updates: mpsc::Receiver<SyncUpdate>,
        cancel: CancellationToken,
        handle: tokio::task::JoinHandle<()>,
    }

    fn start(viewer: Uuid, gate: Arc<dyn VisibilityGate>) -> Harness {
        let feed = ChangeFeed::default();
        let receiver = feed.subscribe();
        let (tx, updates) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let sync = MoodSynchronizer::new(viewer, Roster::new(), gate, tx);
        let handle = tokio::spawn(sync.run(receiver, cancel.clone()));
        Harness { feed, updates, cancel, handle }
    }

    async fn next_update(h: &mut Harness) -> SyncUpdate {
        tokio::time::timeout(std::time::Duration::from_secs(1), h.updates.recv())
            .await
            .expect("update should arrive in time")
            .expect("update channel should be open")
    }

    #[tokio::test]
    async fn initial_snapshot_is_sent() {
        let mut h = start(Uuid::new_v4(), Arc::new(AllowAll));
        match next_update(&mut h).await {
            SyncUpdate::Snapshot { connections } => assert!(connections.is_empty()),
            other => panic!("expected snapshot, got {other:?}"),
        }
        h.cancel.cancel();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn urgent_transition_emits_alert_then_snapshot() {
        let viewer = Uuid::new_v4();
        let subject = Uuid::new_v4();
        let mut h = start(viewer, Arc::new(AllowAll));
        let _ = next_update(&mut h).await; // initial snapshot

        h.feed.publish(ChangeEvent::Insert {
            new: change(subject, "Ada", Mood::MildNeutral, None),
        });
        let _ = next_update(&mut h).await; // snapshot after insert

        h.feed.publish(ChangeEvent::Update {
            old: change(subject, "Ada", Mood::MildNeutral, None),
            new: change(subject, "Ada", Mood::Urgent, Some("overwhelmed")),
        });

        match next_update(&mut h).await {
            SyncUpdate::Urgent { subject_id, full_name } => {
                assert_eq!(subject_id, subject);
                assert_eq!(full_name, "Ada");
            }
            other => panic!("expected urgent alert, got {other:?}"),
        }
        match next_update(&mut h).await {
            SyncUpdate::Snapshot { connections } => {
                assert_eq!(connections.len(), 1);
                assert!(connections[0].mood.is_urgent());
                assert_eq!(connections[0].context.as_deref(), Some("overwhelmed"));
            }
            other => panic!("expected snapshot, got {other:?}"),
        }

        // A second urgent update only yields a snapshot, no new alert.
        h.feed.publish(ChangeEvent::Update {
            old: change(subject, "Ada", Mood::Urgent, Some("overwhelmed")),
            new: change(subject, "Ada", Mood::Urgent, Some("still here")),
        });
        match next_update(&mut h).await {
            SyncUpdate::Snapshot { connections } => {
                assert_eq!(connections[0].context.as_deref(), Some("still here"));
            }
            other => panic!("expected snapshot, got {other:?}"),
        }

        h.cancel.cancel();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn gated_subjects_never_reach_the_roster() {
        let viewer = Uuid::new_v4();
        let hidden = Uuid::new_v4();
        let visible = Uuid::new_v4();
        let gate = Arc::new(DenySubjects(HashSet::from([hidden])));
        let mut h = start(viewer, gate);
        let _ = next_update(&mut h).await;

        h.feed.publish(ChangeEvent::Insert {
            new: change(hidden, "Hidden", Mood::Urgent, Some("secret")),
        });
        h.feed.publish(ChangeEvent::Insert {
            new: change(visible, "Visible", Mood::CalmAndPeaceful, None),
        });

        // Only the visible subject produces an update, and the hidden one's
        // mood never appears in any snapshot.
        match next_update(&mut h).await {
            SyncUpdate::Snapshot { connections } => {
                assert_eq!(connections.len(), 1);
                assert_eq!(connections[0].subject_id, visible);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }

        h.cancel.cancel();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn viewer_own_events_are_ignored() {
        let viewer = Uuid::new_v4();
        let mut h = start(viewer, Arc::new(AllowAll));
        let _ = next_update(&mut h).await;

        h.feed.publish(ChangeEvent::Insert {
            new: change(viewer, "Me", Mood::Urgent, None),
        });
        h.feed.publish(ChangeEvent::Insert {
            new: change(Uuid::new_v4(), "Other", Mood::MildNeutral, None),
        });

        match next_update(&mut h).await {
            SyncUpdate::Snapshot { connections } => {
                assert_eq!(connections.len(), 1);
                assert_eq!(connections[0].full_name, "Other");
            }
            other => panic!("expected snapshot, got {other:?}"),
        }

        h.cancel.cancel();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_stops_the_task() {
        let h = start(Uuid::new_v4(), Arc::new(AllowAll));
        h.cancel.cancel();
        h.handle.await.expect("task should exit cleanly");
    }

    #[tokio::test]
    async fn delete_for_unknown_subject_produces_no_update() {
        let viewer = Uuid::new_v4();
        let mut h = start(viewer, Arc::new(AllowAll));
        let _ = next_update(&mut h).await;

        h.feed.publish(ChangeEvent::Delete {
            old: change(Uuid::new_v4(), "Ghost", Mood::MildNeutral, None),
        });
        // Follow with a real event; the very next update must be its
        // snapshot, proving the delete emitted nothing.
        let subject = Uuid::new_v4();
        h.feed.publish(ChangeEvent::Insert {
            new: change(subject, "Ada", Mood::MildNeutral, None),
        });

        match next_update(&mut h).await {
            SyncUpdate::Snapshot { connections } => {
                assert_eq!(connections.len(), 1);
                assert_eq!(connections[0].subject_id, subject);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }

        h.cancel.cancel();
        h.handle.await.unwrap();
    }
}
