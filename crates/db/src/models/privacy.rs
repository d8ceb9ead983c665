//! Privacy settings row and its conversion to the domain policy type.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use b2gthr_core::types::Timestamp;
use b2gthr_core::visibility::{ConnectionVisibility, GlobalVisibility, PrivacySettings};
use b2gthr_core::Mood;

/// Row from the `privacy_settings` table.
///
/// `global_visibility` and `hidden_moods` are stored loosely (TEXT and
/// SMALLINT[]); [`PrivacySettingsRow::to_domain`] converts them into the
/// strict domain type, failing closed on anything unrecognized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrivacySettingsRow {
    pub user_id: Uuid,
    pub global_visibility: String,
    pub hidden_moods: Vec<i16>,
    pub connection_settings: serde_json::Value,
    pub updated_at: Timestamp,
}

impl PrivacySettingsRow {
    /// Convert the stored row into the domain policy.
    ///
    /// - An unknown `global_visibility` value becomes `none` (fail closed).
    /// - Out-of-range hidden mood indices are dropped with a warning.
    /// - An unreadable `connection_settings` blob becomes the empty map.
    pub fn to_domain(&self) -> PrivacySettings {
        let hidden_moods: BTreeSet<Mood> = self
            .hidden_moods
            .iter()
            .filter_map(|&index| {
                let mood = Mood::from_index(index);
                if mood.is_none() {
                    tracing::warn!(user_id = %self.user_id, index, "Dropping out-of-range hidden mood index");
                }
                mood
            })
            .collect();

        let connection_settings: HashMap<Uuid, ConnectionVisibility> =
            serde_json::from_value(self.connection_settings.clone()).unwrap_or_else(|e| {
                tracing::warn!(user_id = %self.user_id, error = %e, "Unreadable connection_settings, treating as empty");
                HashMap::new()
            });

        PrivacySettings {
            global_visibility: GlobalVisibility::from_str_lossy(&self.global_visibility),
            hidden_moods,
            connection_settings,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn row(global: &str, hidden: Vec<i16>, settings: serde_json::Value) -> PrivacySettingsRow {
        PrivacySettingsRow {
            user_id: Uuid::new_v4(),
            global_visibility: global.to_string(),
            hidden_moods: hidden,
            connection_settings: settings,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_row_converts() {
        let viewer = Uuid::new_v4();
        let domain = row(
            "selected",
            vec![4, 5],
            json!({ viewer.to_string(): { "can_see_all_moods": true } }),
        )
        .to_domain();

        assert_eq!(domain.global_visibility, GlobalVisibility::Selected);
        assert_eq!(
            domain.hidden_moods,
            BTreeSet::from([Mood::HighAlert, Mood::Urgent])
        );
        assert!(domain.connection_settings[&viewer].can_see_all_moods);
    }

    #[test]
    fn test_unknown_global_visibility_fails_closed() {
        let domain = row("public", vec![], json!({})).to_domain();
        assert_eq!(domain.global_visibility, GlobalVisibility::None);
    }

    #[test]
    fn test_out_of_range_hidden_indices_dropped() {
        let domain = row("all", vec![5, 9, -1], json!({})).to_domain();
        assert_eq!(domain.hidden_moods, BTreeSet::from([Mood::Urgent]));
    }

    #[test]
    fn test_unreadable_connection_settings_treated_as_empty() {
        let domain = row("all", vec![], json!([1, 2, 3])).to_domain();
        assert!(domain.connection_settings.is_empty());
    }
}
