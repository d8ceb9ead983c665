//! The fixed six-level mood scale.
//!
//! Moods are stored and transmitted as their integer index (0-5). The scale
//! is totally ordered by urgency; [`Mood::Urgent`] (index 5) is the
//! maximum-urgency sentinel that drives special notification behaviour.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of levels on the mood scale.
pub const MOOD_SCALE_LEN: usize = 6;

/// A mood level on the fixed urgency scale.
///
/// Serialized as the bare integer index. Out-of-range indices are rejected
/// at deserialization, never clamped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum Mood {
    DeeplySerene = 0,
    CalmAndPeaceful = 1,
    MildNeutral = 2,
    SomethingFeelsOff = 3,
    HighAlert = 4,
    Urgent = 5,
}

impl Mood {
    /// The maximum-urgency sentinel (index 5).
    pub const URGENT: Mood = Mood::Urgent;

    /// All moods in scale order, least to most urgent.
    pub const ALL: [Mood; MOOD_SCALE_LEN] = [
        Mood::DeeplySerene,
        Mood::CalmAndPeaceful,
        Mood::MildNeutral,
        Mood::SomethingFeelsOff,
        Mood::HighAlert,
        Mood::Urgent,
    ];

    /// Look up a mood by its integer index. Returns `None` when out of range.
    pub fn from_index(index: i16) -> Option<Mood> {
        match index {
            0 => Some(Mood::DeeplySerene),
            1 => Some(Mood::CalmAndPeaceful),
            2 => Some(Mood::MildNeutral),
            3 => Some(Mood::SomethingFeelsOff),
            4 => Some(Mood::HighAlert),
            5 => Some(Mood::Urgent),
            _ => None,
        }
    }

    /// The mood's integer index on the scale.
    pub fn index(self) -> i16 {
        self as i16
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Mood::DeeplySerene => "Deeply Serene",
            Mood::CalmAndPeaceful => "Calm and Peaceful",
            Mood::MildNeutral => "Mild/Neutral",
            Mood::SomethingFeelsOff => "Something Feels Off",
            Mood::HighAlert => "High Alert",
            Mood::Urgent => "Urgent",
        }
    }

    /// Canonical display colour (hex).
    pub fn color(self) -> &'static str {
        match self {
            Mood::DeeplySerene => "#4f6ef7",
            Mood::CalmAndPeaceful => "#8eb8e5",
            Mood::MildNeutral => "#8a8a8a",
            Mood::SomethingFeelsOff => "#d78f3c",
            Mood::HighAlert => "#e05b4b",
            Mood::Urgent => "#c0392b",
        }
    }

    /// Whether this is the urgent sentinel.
    pub fn is_urgent(self) -> bool {
        self == Mood::Urgent
    }
}

impl From<Mood> for i16 {
    fn from(mood: Mood) -> i16 {
        mood.index()
    }
}

impl TryFrom<i16> for Mood {
    type Error = CoreError;

    fn try_from(index: i16) -> Result<Mood, CoreError> {
        Mood::from_index(index).ok_or_else(|| {
            CoreError::Validation(format!("Mood index must be between 0 and 5, got {index}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_index(mood.index()), Some(mood));
        }
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        assert_eq!(Mood::from_index(-1), None);
        assert_eq!(Mood::from_index(6), None);
        assert_eq!(Mood::from_index(i16::MAX), None);
        assert!(Mood::try_from(6).is_err());
    }

    #[test]
    fn test_urgency_ordering_is_total() {
        assert!(Mood::DeeplySerene < Mood::CalmAndPeaceful);
        assert!(Mood::HighAlert < Mood::Urgent);
        assert_eq!(Mood::ALL.iter().max(), Some(&Mood::Urgent));
    }

    #[test]
    fn test_urgent_sentinel() {
        assert!(Mood::Urgent.is_urgent());
        assert!(!Mood::HighAlert.is_urgent());
        assert_eq!(Mood::URGENT.index(), 5);
    }

    #[test]
    fn test_serializes_as_bare_index() {
        let json = serde_json::to_string(&Mood::SomethingFeelsOff).unwrap();
        assert_eq!(json, "3");

        let mood: Mood = serde_json::from_str("5").unwrap();
        assert_eq!(mood, Mood::Urgent);
    }

    #[test]
    fn test_deserializing_invalid_index_fails() {
        let result: Result<Mood, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn test_names_and_colors_are_distinct() {
        for (i, a) in Mood::ALL.iter().enumerate() {
            for b in &Mood::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
                assert_ne!(a.color(), b.color());
            }
        }
    }
}
