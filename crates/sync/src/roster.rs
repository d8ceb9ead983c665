//! The in-memory roster of a viewer's connections.
//!
//! Keyed by subject id, insertion-ordered. All mutation goes through
//! [`Roster::apply`]; the display order comes from [`Roster::ordered`],
//! a stable two-tier priority sort (urgent first, then high-alert, then
//! everyone else in their prior relative order).

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;
use b2gthr_core::Mood;
use b2gthr_events::{ChangeEvent, ProfileChange};

/// Last-known presence state for one connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub mood: Mood,
    pub context: Option<String>,
    pub last_updated: Timestamp,
    /// Shared board between the viewer and this connection, if one exists.
    /// Populated from the initial seed; live profile events never carry it.
    pub shared_board_id: Option<Uuid>,
}

impl RosterEntry {
    fn from_change(change: &ProfileChange) -> RosterEntry {
        RosterEntry {
            full_name: change.full_name.clone(),
            avatar_url: change.avatar_url.clone(),
            mood: change.mood,
            context: change.context.clone(),
            last_updated: change.updated_at,
            shared_board_id: None,
        }
    }
}

/// Result of applying one change event to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// The subject entered the urgent state with this event. Set on an
    /// insert at urgent and on a non-urgent → urgent update; never set when
    /// an update keeps the mood at urgent.
    pub urgent_entered: bool,
}

/// Insertion-ordered map of `subject_id -> last-known state`.
#[derive(Debug, Default)]
pub struct Roster {
    entries: IndexMap<Uuid, RosterEntry>,
}

impl Roster {
    pub fn new() -> Roster {
        Roster::default()
    }

    /// Pre-populate an entry from a one-shot read (initial connection list).
    ///
    /// Existing entries are left untouched so a live event that raced the
    /// seed read is not rolled back.
    pub fn seed(&mut self, subject_id: Uuid, entry: RosterEntry) {
        self.entries.entry(subject_id).or_insert(entry);
    }

    /// Apply a single change event.
    ///
    /// Returns `None` when the event did not change the roster: an insert
    /// for an already-tracked subject, an update for an untracked one, or a
    /// delete for an unknown one. None of these are errors.
    pub fn apply(&mut self, event: &ChangeEvent) -> Option<Applied> {
        match event {
            ChangeEvent::Insert { new } => {
                if self.entries.contains_key(&new.subject_id) {
                    tracing::debug!(subject_id = %new.subject_id, "Insert for tracked subject ignored");
                    return None;
                }
                let entry = RosterEntry::from_change(new);
                let urgent_entered = entry.mood.is_urgent();
                self.entries.insert(new.subject_id, entry);
                Some(Applied { urgent_entered })
            }
            ChangeEvent::Update { new, .. } => {
                let Some(entry) = self.entries.get_mut(&new.subject_id) else {
                    tracing::debug!(subject_id = %new.subject_id, "Update for untracked subject dropped");
                    return None;
                };
                // Edge-trigger: fire only on the transition into urgent,
                // not on repeated updates that stay there.
                let urgent_entered = new.mood.is_urgent() && !entry.mood.is_urgent();
                entry.full_name = new.full_name.clone();
                entry.avatar_url = new.avatar_url.clone();
                entry.mood = new.mood;
                entry.context = new.context.clone();
                entry.last_updated = new.updated_at;
                Some(Applied { urgent_entered })
            }
            ChangeEvent::Delete { old } => {
                // shift_remove keeps the relative order of the remaining
                // entries intact.
                match self.entries.shift_remove(&old.subject_id) {
                    Some(_) => Some(Applied { urgent_entered: false }),
                    None => None,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, subject_id: Uuid) -> bool {
        self.entries.contains_key(&subject_id)
    }

    pub fn get(&self, subject_id: Uuid) -> Option<&RosterEntry> {
        self.entries.get(&subject_id)
    }

    /// Subject ids in display order: urgent first, then high-alert, then
    /// all others; ties within a tier keep their prior relative order.
    pub fn ordered(&self) -> Vec<Uuid> {
        self.ordered_entries().into_iter().map(|(id, _)| id).collect()
    }

    /// Entries in display order (see [`Roster::ordered`]).
    pub fn ordered_entries(&self) -> Vec<(Uuid, &RosterEntry)> {
        let mut pairs: Vec<(Uuid, &RosterEntry)> =
            self.entries.iter().map(|(id, e)| (*id, e)).collect();
        // Two priority tiers only -- everything below high-alert shares one
        // tier, so a calm connection never jumps over a neutral one.
        pairs.sort_by_key(|(_, entry)| match entry.mood {
            Mood::Urgent => 0u8,
            Mood::HighAlert => 1,
            _ => 2,
        });
        pairs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn change(subject_id: Uuid, mood: Mood, context: Option<&str>) -> ProfileChange {
        ProfileChange {
            subject_id,
            full_name: "Ada".into(),
            avatar_url: None,
            mood,
            context: context.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    fn insert(subject_id: Uuid, mood: Mood) -> ChangeEvent {
        ChangeEvent::Insert { new: change(subject_id, mood, None) }
    }

    fn update(subject_id: Uuid, from: Mood, to: Mood, context: Option<&str>) -> ChangeEvent {
        ChangeEvent::Update {
            old: change(subject_id, from, None),
            new: change(subject_id, to, context),
        }
    }

    // -----------------------------------------------------------------------
    // Last-writer-wins per subject (P1)
    // -----------------------------------------------------------------------

    #[test]
    fn test_final_state_matches_last_event_in_arrival_order() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        roster.apply(&insert(a, Mood::MildNeutral));
        roster.apply(&insert(b, Mood::DeeplySerene));
        // Interleave updates for a and b.
        roster.apply(&update(a, Mood::MildNeutral, Mood::SomethingFeelsOff, Some("off")));
        roster.apply(&update(b, Mood::DeeplySerene, Mood::CalmAndPeaceful, None));
        roster.apply(&update(a, Mood::SomethingFeelsOff, Mood::HighAlert, Some("worse")));

        assert_eq!(roster.get(a).unwrap().mood, Mood::HighAlert);
        assert_eq!(roster.get(a).unwrap().context.as_deref(), Some("worse"));
        assert_eq!(roster.get(b).unwrap().mood, Mood::CalmAndPeaceful);
    }

    // -----------------------------------------------------------------------
    // Urgent edge-trigger (P2, Scenarios B and C)
    // -----------------------------------------------------------------------

    #[test]
    fn test_transition_into_urgent_fires_once() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.apply(&insert(a, Mood::MildNeutral));

        let applied = roster
            .apply(&update(a, Mood::MildNeutral, Mood::Urgent, Some("overwhelmed")))
            .unwrap();
        assert!(applied.urgent_entered);
        assert_eq!(roster.get(a).unwrap().mood, Mood::Urgent);
        assert_eq!(roster.get(a).unwrap().context.as_deref(), Some("overwhelmed"));
    }

    #[test]
    fn test_update_staying_urgent_does_not_refire_but_updates_context() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.apply(&insert(a, Mood::MildNeutral));
        roster.apply(&update(a, Mood::MildNeutral, Mood::Urgent, Some("overwhelmed")));

        let applied = roster
            .apply(&update(a, Mood::Urgent, Mood::Urgent, Some("still struggling")))
            .unwrap();
        assert!(!applied.urgent_entered);
        assert_eq!(
            roster.get(a).unwrap().context.as_deref(),
            Some("still struggling")
        );
    }

    #[test]
    fn test_insert_at_urgent_fires() {
        let mut roster = Roster::new();
        let applied = roster.apply(&insert(Uuid::new_v4(), Mood::Urgent)).unwrap();
        assert!(applied.urgent_entered);
    }

    #[test]
    fn test_leaving_and_reentering_urgent_fires_again() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.apply(&insert(a, Mood::Urgent));
        roster.apply(&update(a, Mood::Urgent, Mood::HighAlert, None));
        let applied = roster
            .apply(&update(a, Mood::HighAlert, Mood::Urgent, None))
            .unwrap();
        assert!(applied.urgent_entered);
    }

    // -----------------------------------------------------------------------
    // Ignored events (Scenario D)
    // -----------------------------------------------------------------------

    #[test]
    fn test_delete_for_unknown_subject_is_noop() {
        let mut roster = Roster::new();
        let event = ChangeEvent::Delete { old: change(Uuid::new_v4(), Mood::MildNeutral, None) };
        assert_eq!(roster.apply(&event), None);
        assert!(roster.is_empty());
    }

    #[test]
    fn test_update_for_untracked_subject_is_dropped() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        assert_eq!(
            roster.apply(&update(a, Mood::MildNeutral, Mood::Urgent, None)),
            None
        );
        assert!(!roster.contains(a));
    }

    #[test]
    fn test_duplicate_insert_ignored() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.apply(&insert(a, Mood::CalmAndPeaceful));
        assert_eq!(roster.apply(&insert(a, Mood::Urgent)), None);
        assert_eq!(roster.get(a).unwrap().mood, Mood::CalmAndPeaceful);
    }

    #[test]
    fn test_delete_removes_subject() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.apply(&insert(a, Mood::MildNeutral));
        let event = ChangeEvent::Delete { old: change(a, Mood::MildNeutral, None) };
        assert_eq!(roster.apply(&event), Some(Applied { urgent_entered: false }));
        assert!(!roster.contains(a));
    }

    // -----------------------------------------------------------------------
    // Display ordering (P4)
    // -----------------------------------------------------------------------

    #[test]
    fn test_urgent_before_high_alert_before_rest() {
        let mut roster = Roster::new();
        let calm = Uuid::new_v4();
        let urgent = Uuid::new_v4();
        let alert = Uuid::new_v4();
        roster.apply(&insert(calm, Mood::CalmAndPeaceful));
        roster.apply(&insert(urgent, Mood::Urgent));
        roster.apply(&insert(alert, Mood::HighAlert));

        assert_eq!(roster.ordered(), vec![urgent, alert, calm]);
    }

    #[test]
    fn test_ordering_is_stable_within_a_tier() {
        let mut roster = Roster::new();
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        // Two serene, two neutral -- all in the bottom tier.
        roster.apply(&insert(ids[0], Mood::DeeplySerene));
        roster.apply(&insert(ids[1], Mood::MildNeutral));
        roster.apply(&insert(ids[2], Mood::DeeplySerene));
        roster.apply(&insert(ids[3], Mood::SomethingFeelsOff));

        // No full ordering by mood index: insertion order is preserved.
        assert_eq!(roster.ordered(), ids);
    }

    #[test]
    fn test_promotion_moves_subject_to_front_tier() {
        let mut roster = Roster::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        roster.apply(&insert(first, Mood::MildNeutral));
        roster.apply(&insert(second, Mood::MildNeutral));

        roster.apply(&update(second, Mood::MildNeutral, Mood::Urgent, None));
        assert_eq!(roster.ordered(), vec![second, first]);
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    #[test]
    fn test_seed_does_not_overwrite_live_entry() {
        let mut roster = Roster::new();
        let a = Uuid::new_v4();
        roster.apply(&insert(a, Mood::Urgent));

        roster.seed(
            a,
            RosterEntry {
                full_name: "Stale".into(),
                avatar_url: None,
                mood: Mood::MildNeutral,
                context: None,
                last_updated: Utc::now(),
                shared_board_id: None,
            },
        );
        assert_eq!(roster.get(a).unwrap().mood, Mood::Urgent);
    }
}
