//! Connection-request state machine and integrity checks.
//!
//! A connection request moves `pending → accepted` or `pending → declined`;
//! both outcomes are terminal. Accepting a request creates two directed
//! connection edges (sender→recipient and recipient→sender). The write
//! itself is transactional in the repository layer; this module owns the
//! legality rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Lifecycle state of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    /// Parse from the stored string form.
    pub fn from_str(value: &str) -> Option<RequestStatus> {
        match value {
            "pending" => Some(RequestStatus::Pending),
            "accepted" => Some(RequestStatus::Accepted),
            "declined" => Some(RequestStatus::Declined),
            _ => None,
        }
    }

    /// The stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
        }
    }

    /// Whether the request can still change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Accepted | RequestStatus::Declined)
    }

    /// Validate a state transition. Only `pending → accepted` and
    /// `pending → declined` are legal.
    pub fn transition_to(self, next: RequestStatus) -> Result<RequestStatus, CoreError> {
        match (self, next) {
            (RequestStatus::Pending, RequestStatus::Accepted)
            | (RequestStatus::Pending, RequestStatus::Declined) => Ok(next),
            _ => Err(CoreError::Conflict(format!(
                "Connection request cannot move from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            ))),
        }
    }
}

/// Reject requests that can never be valid, before any write.
///
/// Duplicate-pending and already-connected checks need the database and live
/// in the handler; this catches the structurally invalid case.
pub fn validate_new_request(sender: Uuid, recipient: Uuid) -> Result<(), CoreError> {
    if sender == recipient {
        return Err(CoreError::Validation(
            "You cannot send a connection request to yourself".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_pending_accepts_and_declines() {
        assert_eq!(
            RequestStatus::Pending
                .transition_to(RequestStatus::Accepted)
                .unwrap(),
            RequestStatus::Accepted
        );
        assert_eq!(
            RequestStatus::Pending
                .transition_to(RequestStatus::Declined)
                .unwrap(),
            RequestStatus::Declined
        );
    }

    #[test]
    fn test_terminal_states_reject_further_transitions() {
        for from in [RequestStatus::Accepted, RequestStatus::Declined] {
            for to in [
                RequestStatus::Pending,
                RequestStatus::Accepted,
                RequestStatus::Declined,
            ] {
                assert_matches!(from.transition_to(to), Err(CoreError::Conflict(_)));
            }
        }
    }

    #[test]
    fn test_pending_cannot_return_to_pending() {
        assert_matches!(
            RequestStatus::Pending.transition_to(RequestStatus::Pending),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_self_connection_rejected() {
        let me = Uuid::new_v4();
        assert_matches!(
            validate_new_request(me, me),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_distinct_users_accepted() {
        assert!(validate_new_request(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_status_string_round_trip() {
        for s in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Declined,
        ] {
            assert_eq!(RequestStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(RequestStatus::from_str("cancelled"), None);
    }
}
