//! Change notifications emitted after every event-scoped mutation.
//!
//! Every state change publishes a [`ChangeEvent`] through the
//! [`super::ChangeBus`]. Notifications are deliberately thin — ids and a
//! timestamp, never the mutated record — so consumers always re-fetch the
//! full snapshot and recompute aggregation from scratch instead of
//! patching local state incrementally.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::EventId;

/// What happened to a response row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseChange {
    /// A user set or updated their own response.
    Set,
    /// A guest entry was added.
    GuestAdded,
    /// A response row was deleted.
    Removed,
}

/// Thin notification broadcast after a mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "change_type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A new event was created.
    EventCreated {
        /// Event identifier.
        event_id: EventId,
        /// Owning team.
        team_id: Uuid,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An event's configuration was updated (title, date, capacity,
    /// options, ...). Consumers must refetch: a capacity or option change
    /// reshapes the entire confirmed/waitlist split.
    EventUpdated {
        /// Event identifier.
        event_id: EventId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An event was deleted.
    EventRemoved {
        /// Event identifier.
        event_id: EventId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A response row was created, updated, or deleted.
    ResponseChanged {
        /// Event the response belongs to.
        event_id: EventId,
        /// The affected response row.
        response_id: Uuid,
        /// What happened to the row.
        change: ResponseChange,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ChangeEvent {
    /// Returns the event ID associated with this change.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::EventUpdated { event_id, .. }
            | Self::EventRemoved { event_id, .. }
            | Self::ResponseChanged { event_id, .. } => *event_id,
        }
    }

    /// Returns the change type as a static string slice.
    #[must_use]
    pub const fn change_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventRemoved { .. } => "event_removed",
            Self::ResponseChanged { .. } => "response_changed",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn event_id_accessor() {
        let id = EventId::new();
        let change = ChangeEvent::EventRemoved {
            event_id: id,
            timestamp: Utc::now(),
        };
        assert_eq!(change.event_id(), id);
    }

    #[test]
    fn response_changed_serializes() {
        let change = ChangeEvent::ResponseChanged {
            event_id: EventId::new(),
            response_id: Uuid::new_v4(),
            change: ResponseChange::GuestAdded,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&change).unwrap_or_default();
        assert!(json.contains("response_changed"));
        assert!(json.contains("guest_added"));
    }

    #[test]
    fn change_type_strings() {
        let change = ChangeEvent::EventCreated {
            event_id: EventId::new(),
            team_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };
        assert_eq!(change.change_type_str(), "event_created");
    }
}
