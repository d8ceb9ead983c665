//! Row-level change events for the `profiles` table.
//!
//! The feed payload is a closed tagged union: every variant names exactly
//! the fields it carries, and construction from loose JSON rejects payloads
//! with missing fields or an out-of-range mood index instead of coercing
//! them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use b2gthr_core::types::Timestamp;
use b2gthr_core::Mood;

/// The profile row snapshot carried in a change event.
///
/// `mood` deserializes through the [`Mood`] index type, so an out-of-range
/// value fails the whole event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileChange {
    pub subject_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub mood: Mood,
    pub context: Option<String>,
    pub updated_at: Timestamp,
}

/// A row-level change on the `profiles` table.
///
/// Serialized as JSON with an internally-tagged `"type"` discriminator
/// (`"insert"` / `"update"` / `"delete"`), mirroring the old/new row shape
/// of a relational change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChangeEvent {
    Insert { new: ProfileChange },
    Update { old: ProfileChange, new: ProfileChange },
    Delete { old: ProfileChange },
}

impl ChangeEvent {
    /// The id of the subject this event concerns.
    pub fn subject_id(&self) -> Uuid {
        match self {
            ChangeEvent::Insert { new } => new.subject_id,
            ChangeEvent::Update { new, .. } => new.subject_id,
            ChangeEvent::Delete { old } => old.subject_id,
        }
    }

    /// Parse an event from a loose JSON payload.
    ///
    /// Missing required fields, an unknown `type` tag, or an invalid mood
    /// index are all rejected -- never defaulted.
    pub fn from_json(value: serde_json::Value) -> Result<ChangeEvent, serde_json::Error> {
        serde_json::from_value(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(mood: i16) -> serde_json::Value {
        json!({
            "subject_id": Uuid::new_v4(),
            "full_name": "Ada",
            "avatar_url": null,
            "mood": mood,
            "context": "settling in",
            "updated_at": "2026-08-01T10:00:00Z",
        })
    }

    #[test]
    fn test_parse_insert() {
        let event = ChangeEvent::from_json(json!({ "type": "insert", "new": row(2) }))
            .expect("valid insert should parse");
        match event {
            ChangeEvent::Insert { new } => {
                assert_eq!(new.mood, Mood::MildNeutral);
                assert_eq!(new.context.as_deref(), Some("settling in"));
            }
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_update_carries_old_and_new() {
        let event = ChangeEvent::from_json(json!({
            "type": "update",
            "old": row(2),
            "new": row(5),
        }))
        .expect("valid update should parse");
        match event {
            ChangeEvent::Update { old, new } => {
                assert_eq!(old.mood, Mood::MildNeutral);
                assert!(new.mood.is_urgent());
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_delete() {
        let event = ChangeEvent::from_json(json!({ "type": "delete", "old": row(0) }))
            .expect("valid delete should parse");
        assert!(matches!(event, ChangeEvent::Delete { .. }));
    }

    #[test]
    fn test_missing_subject_id_rejected() {
        let mut r = row(1);
        r.as_object_mut().unwrap().remove("subject_id");
        assert!(ChangeEvent::from_json(json!({ "type": "insert", "new": r })).is_err());
    }

    #[test]
    fn test_out_of_range_mood_rejected() {
        assert!(ChangeEvent::from_json(json!({ "type": "insert", "new": row(9) })).is_err());
        assert!(ChangeEvent::from_json(json!({ "type": "insert", "new": row(-1) })).is_err());
    }

    #[test]
    fn test_unknown_type_tag_rejected() {
        assert!(ChangeEvent::from_json(json!({ "type": "upsert", "new": row(1) })).is_err());
    }

    #[test]
    fn test_update_without_old_row_rejected() {
        assert!(ChangeEvent::from_json(json!({ "type": "update", "new": row(1) })).is_err());
    }

    #[test]
    fn test_subject_id_accessor() {
        let r = row(3);
        let id: Uuid = serde_json::from_value(r["subject_id"].clone()).unwrap();
        let event = ChangeEvent::from_json(json!({ "type": "delete", "old": r })).unwrap();
        assert_eq!(event.subject_id(), id);
    }
}
