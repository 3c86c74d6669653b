//! Attendance responses: member responses and guest entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventId;

/// Who a response belongs to.
///
/// Exactly one of the two holds: either a registered user responding for
/// themselves, or a free-text guest entered by another user. The enum makes
/// the mutual exclusion structural instead of a pair of nullable columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Responder {
    /// A registered user.
    Member {
        /// The responding user's id.
        user_id: Uuid,
    },
    /// A guest without an account, entered on someone's behalf.
    Guest {
        /// Free-text guest name.
        name: String,
    },
}

/// A single attendance response to an event.
///
/// One row per user per event (upserted in place when the user changes
/// their answer); guests get one row each. The `response` label is matched
/// against the event's option labels by string equality and is deliberately
/// not validated — an orphaned label simply stops being counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    /// Unique response identifier.
    pub id: Uuid,
    /// The event this response belongs to.
    pub event_id: EventId,
    /// Member or guest responder.
    pub responder: Responder,
    /// Response label; matched against [`super::option::ResponseOption::label`].
    pub response: String,
    /// User who created the record: the responder for self-responses, the
    /// inviting user for guest entries.
    pub added_by: Uuid,
    /// Creation timestamp. Orders the confirmed/waitlist split.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    /// Returns the responding user's id, or `None` for guests.
    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        match &self.responder {
            Responder::Member { user_id } => Some(*user_id),
            Responder::Guest { .. } => None,
        }
    }

    /// Returns `true` if this is a guest entry.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self.responder, Responder::Guest { .. })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_response(responder: Responder) -> EventResponse {
        EventResponse {
            id: Uuid::new_v4(),
            event_id: EventId::new(),
            responder,
            response: "Going".to_string(),
            added_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn member_has_user_id() {
        let user_id = Uuid::new_v4();
        let response = make_response(Responder::Member { user_id });
        assert_eq!(response.user_id(), Some(user_id));
        assert!(!response.is_guest());
    }

    #[test]
    fn guest_has_no_user_id() {
        let response = make_response(Responder::Guest {
            name: "Cousin Pavel".to_string(),
        });
        assert_eq!(response.user_id(), None);
        assert!(response.is_guest());
    }

    #[test]
    fn responder_serializes_tagged() {
        let json = serde_json::to_string(&Responder::Guest {
            name: "Ana".to_string(),
        })
        .unwrap_or_default();
        assert!(json.contains("guest"));
        assert!(json.contains("Ana"));
    }
}
