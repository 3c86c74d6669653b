//! Event aggregate: schedule entry with capacity and response options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventId;
use super::option::ResponseOption;

/// A scheduled team event.
///
/// `capacity == 0` means unlimited. The option list is ordered; its order
/// drives roster grouping. Events whose `date` has passed are closed: the
/// service layer rejects any further mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier (immutable after creation).
    pub id: EventId,
    /// Owning team.
    pub team_id: Uuid,
    /// Display title.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Free-text location.
    pub location: String,
    /// Maximum confirmed attendees; `0` means unlimited.
    pub capacity: u32,
    /// Optional longer description.
    pub description: Option<String>,
    /// Ordered, user-authored response options.
    pub response_options: Vec<ResponseOption>,
    /// User who created the event.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Returns `true` if the event date is in the past relative to `now`.
    ///
    /// Closed events are read-only: edits, responses, and guest entries
    /// are all rejected by the service layer.
    #[must_use]
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::option::OptionColor;
    use chrono::Duration;

    fn make_event(date: DateTime<Utc>) -> Event {
        Event {
            id: EventId::new(),
            team_id: Uuid::new_v4(),
            title: "Practice".to_string(),
            date,
            location: "Gym 2".to_string(),
            capacity: 10,
            description: None,
            response_options: vec![ResponseOption::new(1, "Going", true, OptionColor::Green)],
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn future_event_is_open() {
        let now = Utc::now();
        let event = make_event(now + Duration::hours(1));
        assert!(!event.is_closed(now));
    }

    #[test]
    fn past_event_is_closed() {
        let now = Utc::now();
        let event = make_event(now - Duration::hours(1));
        assert!(event.is_closed(now));
    }

    #[test]
    fn event_exactly_at_now_is_open() {
        let now = Utc::now();
        let event = make_event(now);
        assert!(!event.is_closed(now));
    }
}
