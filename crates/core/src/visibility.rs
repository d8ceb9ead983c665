//! Privacy engine: decides whether a viewer may see a subject's mood.
//!
//! The policy is fail-closed: no connection edge means no disclosure, and an
//! unrecognized global-visibility value is treated as
//! [`GlobalVisibility::None`]. When [`can_view_mood`] returns `false` the
//! caller must substitute a neutral placeholder, never the real mood value
//! or its context text.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mood::Mood;

// ---------------------------------------------------------------------------
// Policy types
// ---------------------------------------------------------------------------

/// Default mood disclosure towards all connections, absent a per-connection
/// override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalVisibility {
    /// Every connection may see moods, minus the hidden set.
    All,
    /// Only connections with an explicit per-connection entry may see moods.
    Selected,
    /// No connection may see moods.
    None,
}

impl GlobalVisibility {
    /// Parse from the stored string form.
    ///
    /// Unknown values fail closed to [`GlobalVisibility::None`].
    pub fn from_str_lossy(value: &str) -> GlobalVisibility {
        match value {
            "all" => GlobalVisibility::All,
            "selected" => GlobalVisibility::Selected,
            "none" => GlobalVisibility::None,
            _ => GlobalVisibility::None,
        }
    }

    /// The stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            GlobalVisibility::All => "all",
            GlobalVisibility::Selected => "selected",
            GlobalVisibility::None => "none",
        }
    }
}

/// Per-connection visibility override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionVisibility {
    /// When `true`, the connection sees every mood, including hidden ones.
    pub can_see_all_moods: bool,
}

/// A user's complete privacy configuration (one per user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub global_visibility: GlobalVisibility,
    /// Moods withheld from connections that lack a full-visibility override.
    pub hidden_moods: BTreeSet<Mood>,
    /// Per-connection overrides, keyed by the connection's user id.
    pub connection_settings: HashMap<Uuid, ConnectionVisibility>,
}

impl PrivacySettings {
    /// The configuration provisioned at sign-up.
    ///
    /// Note the shipped default hides `Urgent` from connections unless a
    /// per-connection override grants full visibility. Counter-intuitive for
    /// a support-network app, but preserved as the configurable default
    /// rather than silently inverted.
    pub fn default_for_new_user() -> PrivacySettings {
        PrivacySettings {
            global_visibility: GlobalVisibility::All,
            hidden_moods: BTreeSet::from([Mood::Urgent]),
            connection_settings: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision procedure
// ---------------------------------------------------------------------------

/// Decide whether `viewer` may see `subject`'s current `mood`.
///
/// Decision order:
///
/// 1. A user always sees their own mood.
/// 2. No connection edge → deny.
/// 3. Global `none` → deny.
/// 4. Global `selected` with no per-connection entry for the viewer → deny.
/// 5. A per-connection entry with `can_see_all_moods == true` → allow
///    (the override wins over the global hidden-moods list).
/// 6. A per-connection entry with `can_see_all_moods == false` → deny only
///    moods in the hidden set.
/// 7. Global `all` with no entry → allow except moods in the hidden set.
pub fn can_view_mood(
    viewer: Uuid,
    subject: Uuid,
    mood: Mood,
    settings: &PrivacySettings,
    connection_exists: bool,
) -> bool {
    if viewer == subject {
        return true;
    }
    if !connection_exists {
        return false;
    }

    match settings.connection_settings.get(&viewer) {
        Some(entry) => {
            if settings.global_visibility == GlobalVisibility::None {
                return false;
            }
            if entry.can_see_all_moods {
                true
            } else {
                !settings.hidden_moods.contains(&mood)
            }
        }
        None => match settings.global_visibility {
            GlobalVisibility::All => !settings.hidden_moods.contains(&mood),
            GlobalVisibility::Selected | GlobalVisibility::None => false,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    fn settings(global: GlobalVisibility) -> PrivacySettings {
        PrivacySettings {
            global_visibility: global,
            hidden_moods: BTreeSet::from([Mood::Urgent]),
            connection_settings: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Fail-closed behaviour (P3)
    // -----------------------------------------------------------------------

    #[test]
    fn test_no_connection_edge_always_denies() {
        let (viewer, subject) = ids();
        for global in [
            GlobalVisibility::All,
            GlobalVisibility::Selected,
            GlobalVisibility::None,
        ] {
            let mut s = settings(global);
            // Even an explicit full-visibility override must not leak
            // without an edge.
            s.connection_settings
                .insert(viewer, ConnectionVisibility { can_see_all_moods: true });
            for mood in Mood::ALL {
                assert!(!can_view_mood(viewer, subject, mood, &s, false));
            }
        }
    }

    #[test]
    fn test_unknown_global_visibility_fails_closed() {
        assert_eq!(
            GlobalVisibility::from_str_lossy("everyone"),
            GlobalVisibility::None
        );
        assert_eq!(GlobalVisibility::from_str_lossy(""), GlobalVisibility::None);
        assert_eq!(
            GlobalVisibility::from_str_lossy("ALL"),
            GlobalVisibility::None
        );
    }

    #[test]
    fn test_global_none_denies_even_with_edge() {
        let (viewer, subject) = ids();
        let s = settings(GlobalVisibility::None);
        assert!(!can_view_mood(viewer, subject, Mood::DeeplySerene, &s, true));
    }

    // -----------------------------------------------------------------------
    // Self-view
    // -----------------------------------------------------------------------

    #[test]
    fn test_user_always_sees_own_mood() {
        let me = Uuid::new_v4();
        let s = settings(GlobalVisibility::None);
        // No edge to oneself, global none, mood hidden: still visible.
        assert!(can_view_mood(me, me, Mood::Urgent, &s, false));
    }

    // -----------------------------------------------------------------------
    // Global "selected" (Scenario A)
    // -----------------------------------------------------------------------

    #[test]
    fn test_selected_without_entry_denies_least_urgent_mood() {
        let (viewer, subject) = ids();
        let s = settings(GlobalVisibility::Selected);
        assert!(!can_view_mood(viewer, subject, Mood::DeeplySerene, &s, true));
    }

    #[test]
    fn test_selected_with_entry_respects_hidden_set() {
        let (viewer, subject) = ids();
        let mut s = settings(GlobalVisibility::Selected);
        s.connection_settings
            .insert(viewer, ConnectionVisibility { can_see_all_moods: false });

        assert!(can_view_mood(viewer, subject, Mood::HighAlert, &s, true));
        assert!(!can_view_mood(viewer, subject, Mood::Urgent, &s, true));
    }

    // -----------------------------------------------------------------------
    // Overrides vs the global hidden list
    // -----------------------------------------------------------------------

    #[test]
    fn test_full_visibility_override_wins_over_hidden_moods() {
        let (viewer, subject) = ids();
        let mut s = settings(GlobalVisibility::All);
        s.connection_settings
            .insert(viewer, ConnectionVisibility { can_see_all_moods: true });

        assert!(can_view_mood(viewer, subject, Mood::Urgent, &s, true));
    }

    #[test]
    fn test_global_all_hides_hidden_moods_without_override() {
        let (viewer, subject) = ids();
        let s = settings(GlobalVisibility::All);

        assert!(can_view_mood(viewer, subject, Mood::MildNeutral, &s, true));
        assert!(!can_view_mood(viewer, subject, Mood::Urgent, &s, true));
    }

    #[test]
    fn test_override_for_other_viewer_does_not_apply() {
        let (viewer, subject) = ids();
        let mut s = settings(GlobalVisibility::Selected);
        s.connection_settings.insert(
            Uuid::new_v4(),
            ConnectionVisibility { can_see_all_moods: true },
        );
        assert!(!can_view_mood(viewer, subject, Mood::MildNeutral, &s, true));
    }

    // -----------------------------------------------------------------------
    // Defaults
    // -----------------------------------------------------------------------

    #[test]
    fn test_new_user_default_hides_only_urgent() {
        let s = PrivacySettings::default_for_new_user();
        assert_eq!(s.global_visibility, GlobalVisibility::All);
        assert_eq!(s.hidden_moods, BTreeSet::from([Mood::Urgent]));
        assert!(s.connection_settings.is_empty());
    }

    #[test]
    fn test_global_visibility_string_round_trip() {
        for g in [
            GlobalVisibility::All,
            GlobalVisibility::Selected,
            GlobalVisibility::None,
        ] {
            assert_eq!(GlobalVisibility::from_str_lossy(g.as_str()), g);
        }
    }
}
