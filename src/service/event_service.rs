//! Event service: orchestrates event and response operations and emits
//! change notifications.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::capacity::{self, CapacityState, OptionGroup, RosterSplit};
use crate::domain::change::{ChangeEvent, ResponseChange};
use crate::domain::response::Responder;
use crate::domain::team::TeamRole;
use crate::domain::{ChangeBus, Event, EventId, EventResponse, ResponseOption};
use crate::error::ApiError;
use crate::persistence::PostgresStore;

/// Fields for a new event.
#[derive(Debug, Clone)]
pub struct NewEvent {
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
    /// Optional description.
    pub description: Option<String>,
    /// Ordered response options; at least one required.
    pub response_options: Vec<ResponseOption>,
    /// Creating user.
    pub created_by: Uuid,
}

/// Partial update of an event's mutable fields.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New location.
    pub location: Option<String>,
    /// New capacity.
    pub capacity: Option<u32>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// Replacement option list.
    pub response_options: Option<Vec<ResponseOption>>,
}

/// An event snapshot together with every derived aggregation fact.
///
/// Built fresh on every fetch — consumers of the change feed call
/// [`EventService::get_event`] again rather than patching a previous
/// detail in place.
#[derive(Debug, Clone)]
pub struct EventDetail {
    /// The event configuration.
    pub event: Event,
    /// All current responses, oldest first.
    pub responses: Vec<EventResponse>,
    /// Derived capacity facts.
    pub capacity: CapacityState,
    /// FIFO confirmed/waitlist split.
    pub roster: RosterSplit,
    /// Responses grouped under each declared option.
    pub groups: Vec<OptionGroup>,
}

/// Orchestration layer for event and response operations.
///
/// Stateless coordinator: owns a [`PostgresStore`] handle for records and
/// a [`ChangeBus`] for notifications. Every mutation follows the pattern:
/// check permissions → write → publish change → return result. Aggregation
/// itself stays in [`crate::domain::capacity`] and is recomputed from a
/// fresh snapshot on every read.
#[derive(Debug, Clone)]
pub struct EventService {
    store: PostgresStore,
    change_bus: ChangeBus,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: PostgresStore, change_bus: ChangeBus) -> Self {
        Self { store, change_bus }
    }

    /// Returns a reference to the inner [`ChangeBus`].
    #[must_use]
    pub fn change_bus(&self) -> &ChangeBus {
        &self.change_bus
    }

    /// Creates a new event for a team.
    ///
    /// The creator must be a member of the team. The title must be
    /// non-empty and at least one response option is required.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on validation failure, unknown team, or
    /// missing membership.
    pub async fn create_event(&self, new: NewEvent) -> Result<Event, ApiError> {
        validate_title(&new.title)?;
        validate_options(&new.response_options)?;

        if self.store.get_team(new.team_id).await?.is_none() {
            return Err(ApiError::TeamNotFound(new.team_id));
        }
        if self
            .store
            .get_membership(new.team_id, new.created_by)
            .await?
            .is_none()
        {
            return Err(ApiError::Forbidden(
                "only team members can create events".to_string(),
            ));
        }

        let now = Utc::now();
        let event = Event {
            id: EventId::new(),
            team_id: new.team_id,
            title: new.title.trim().to_string(),
            date: new.date,
            location: new.location,
            capacity: new.capacity,
            description: new.description,
            response_options: new.response_options,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_event(&event).await?;

        let _ = self.change_bus.publish(ChangeEvent::EventCreated {
            event_id: event.id,
            team_id: event.team_id,
            timestamp: now,
        });

        tracing::info!(event_id = %event.id, team_id = %event.team_id, "event created");
        Ok(event)
    }

    /// Fetches an event snapshot with all derived aggregation facts.
    ///
    /// A failure fetching the response list degrades to an empty roster
    /// instead of failing the whole read, so a broken response row never
    /// blocks rendering the event itself.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EventNotFound`] if the event does not exist.
    pub async fn get_event(&self, event_id: EventId) -> Result<EventDetail, ApiError> {
        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| ApiError::EventNotFound(*event_id.as_uuid()))?;

        let responses = match self.store.list_event_responses(event_id).await {
            Ok(responses) => responses,
            Err(err) => {
                tracing::warn!(%event_id, error = %err, "response fetch failed; using empty list");
                Vec::new()
            }
        };

        Ok(build_detail(event, responses))
    }

    /// Lists a team's events with capacity facts, newest date first.
    ///
    /// A response fetch failure for one event degrades that event to an
    /// empty roster without blocking the rest of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TeamNotFound`] if the team does not exist.
    pub async fn list_team_events(&self, team_id: Uuid) -> Result<Vec<EventDetail>, ApiError> {
        if self.store.get_team(team_id).await?.is_none() {
            return Err(ApiError::TeamNotFound(team_id));
        }

        let events = self.store.list_team_events(team_id).await?;
        let mut details = Vec::with_capacity(events.len());
        for event in events {
            let responses = match self.store.list_event_responses(event.id).await {
                Ok(responses) => responses,
                Err(err) => {
                    tracing::warn!(event_id = %event.id, error = %err, "response fetch failed");
                    Vec::new()
                }
            };
            details.push(build_detail(event, responses));
        }
        Ok(details)
    }

    /// Updates an event's configuration.
    ///
    /// Only the creator or a team admin may edit, and only while the
    /// event date is in the future.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing event, missing permission, a
    /// closed event, or validation failure.
    pub async fn update_event(
        &self,
        event_id: EventId,
        requester: Uuid,
        patch: EventPatch,
    ) -> Result<Event, ApiError> {
        let mut event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| ApiError::EventNotFound(*event_id.as_uuid()))?;

        self.check_can_manage(&event, requester).await?;
        if event.is_closed(Utc::now()) {
            return Err(ApiError::EventClosed(event.id));
        }

        if let Some(title) = patch.title {
            validate_title(&title)?;
            event.title = title.trim().to_string();
        }
        if let Some(options) = patch.response_options {
            validate_options(&options)?;
            event.response_options = options;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(capacity) = patch.capacity {
            event.capacity = capacity;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        event.updated_at = Utc::now();

        self.store.update_event(&event).await?;

        let _ = self.change_bus.publish(ChangeEvent::EventUpdated {
            event_id: event.id,
            timestamp: event.updated_at,
        });

        tracing::info!(%event_id, "event updated");
        Ok(event)
    }

    /// Deletes an event.
    ///
    /// Same permission and closed-event rules as [`Self::update_event`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing event, missing permission, or a
    /// closed event.
    pub async fn delete_event(&self, event_id: EventId, requester: Uuid) -> Result<(), ApiError> {
        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| ApiError::EventNotFound(*event_id.as_uuid()))?;

        self.check_can_manage(&event, requester).await?;
        if event.is_closed(Utc::now()) {
            return Err(ApiError::EventClosed(event.id));
        }

        self.store.delete_event(event_id).await?;

        let _ = self.change_bus.publish(ChangeEvent::EventRemoved {
            event_id,
            timestamp: Utc::now(),
        });

        tracing::info!(%event_id, "event removed");
        Ok(())
    }

    /// Sets or updates the caller's own response (upsert: one row per
    /// user per event).
    ///
    /// The label is deliberately not validated against the option list —
    /// a stale client may still reference a renamed option; the response
    /// is recorded and simply stops counting until it matches again.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing event, closed event, or missing
    /// team membership.
    pub async fn set_response(
        &self,
        event_id: EventId,
        user_id: Uuid,
        label: String,
    ) -> Result<EventResponse, ApiError> {
        let event = self.open_event_for_member(event_id, user_id).await?;

        let response = if let Some(existing) = self.store.find_user_response(event_id, user_id).await? {
            self.store.update_response_label(existing.id, &label).await?;
            EventResponse {
                response: label,
                updated_at: Utc::now(),
                ..existing
            }
        } else {
            let now = Utc::now();
            let response = EventResponse {
                id: Uuid::new_v4(),
                event_id,
                responder: Responder::Member { user_id },
                response: label,
                added_by: user_id,
                created_at: now,
                updated_at: now,
            };
            self.store.insert_response(&response).await?;
            response
        };

        let _ = self.change_bus.publish(ChangeEvent::ResponseChanged {
            event_id: event.id,
            response_id: response.id,
            change: ResponseChange::Set,
            timestamp: response.updated_at,
        });

        tracing::info!(%event_id, %user_id, label = %response.response, "response set");
        Ok(response)
    }

    /// Adds a guest entry on behalf of a member.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on an empty guest name, missing event,
    /// closed event, or missing team membership.
    pub async fn add_guest(
        &self,
        event_id: EventId,
        added_by: Uuid,
        guest_name: String,
        label: String,
    ) -> Result<EventResponse, ApiError> {
        if guest_name.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "guest name must not be empty".to_string(),
            ));
        }
        let event = self.open_event_for_member(event_id, added_by).await?;

        let now = Utc::now();
        let response = EventResponse {
            id: Uuid::new_v4(),
            event_id,
            responder: Responder::Guest {
                name: guest_name.trim().to_string(),
            },
            response: label,
            added_by,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_response(&response).await?;

        let _ = self.change_bus.publish(ChangeEvent::ResponseChanged {
            event_id: event.id,
            response_id: response.id,
            change: ResponseChange::GuestAdded,
            timestamp: now,
        });

        tracing::info!(%event_id, %added_by, "guest added");
        Ok(response)
    }

    /// Removes a response row.
    ///
    /// Allowed for the responder themselves, the user who added the
    /// entry (guest rows), or a team admin.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing response, closed event, or
    /// missing permission.
    pub async fn remove_response(
        &self,
        response_id: Uuid,
        requester: Uuid,
    ) -> Result<(), ApiError> {
        let response = self
            .store
            .get_response(response_id)
            .await?
            .ok_or(ApiError::ResponseNotFound(response_id))?;

        let event = self
            .store
            .get_event(response.event_id)
            .await?
            .ok_or_else(|| ApiError::EventNotFound(*response.event_id.as_uuid()))?;

        if event.is_closed(Utc::now()) {
            return Err(ApiError::EventClosed(event.id));
        }

        let own = response.user_id() == Some(requester) || response.added_by == requester;
        if !own {
            let membership = self.store.get_membership(event.team_id, requester).await?;
            let is_admin = membership.is_some_and(|m| m.role == TeamRole::Admin);
            if !is_admin {
                return Err(ApiError::Forbidden(
                    "only the responder, the inviting user, or an admin may remove a response"
                        .to_string(),
                ));
            }
        }

        self.store.delete_response(response_id).await?;

        let _ = self.change_bus.publish(ChangeEvent::ResponseChanged {
            event_id: event.id,
            response_id,
            change: ResponseChange::Removed,
            timestamp: Utc::now(),
        });

        tracing::info!(%response_id, event_id = %event.id, "response removed");
        Ok(())
    }

    /// Fetches an event and checks that it is open and that `user_id` is
    /// a member of its team.
    async fn open_event_for_member(
        &self,
        event_id: EventId,
        user_id: Uuid,
    ) -> Result<Event, ApiError> {
        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| ApiError::EventNotFound(*event_id.as_uuid()))?;

        if event.is_closed(Utc::now()) {
            return Err(ApiError::EventClosed(event.id));
        }
        if self
            .store
            .get_membership(event.team_id, user_id)
            .await?
            .is_none()
        {
            return Err(ApiError::Forbidden(
                "only team members can respond to events".to_string(),
            ));
        }
        Ok(event)
    }

    /// Checks that `requester` may edit or delete `event` (creator or
    /// team admin).
    async fn check_can_manage(&self, event: &Event, requester: Uuid) -> Result<(), ApiError> {
        let role = self
            .store
            .get_membership(event.team_id, requester)
            .await?
            .map(|m| m.role);
        if can_manage_event(event, requester, role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "only the creator or a team admin may modify this event".to_string(),
            ))
        }
    }
}

/// Returns `true` if `requester` may edit or delete the event.
fn can_manage_event(event: &Event, requester: Uuid, role: Option<TeamRole>) -> bool {
    event.created_by == requester || role == Some(TeamRole::Admin)
}

/// Builds an [`EventDetail`] by running every aggregation over the
/// snapshot.
fn build_detail(event: Event, responses: Vec<EventResponse>) -> EventDetail {
    let capacity = capacity::capacity_state(&event, &responses);
    let roster = capacity::split_confirmed_waitlist(&event, &responses);
    let groups = capacity::group_by_option(&event, &responses);
    EventDetail {
        event,
        responses,
        capacity,
        roster,
        groups,
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_options(options: &[ResponseOption]) -> Result<(), ApiError> {
    if options.is_empty() {
        return Err(ApiError::InvalidRequest(
            "at least one response option is required".to_string(),
        ));
    }
    // Duplicate labels are tolerated (no hard uniqueness constraint),
    // but they make label matching ambiguous, so leave a trace.
    let mut seen = std::collections::HashSet::new();
    for opt in options {
        if !seen.insert(opt.label.as_str()) {
            tracing::debug!(label = %opt.label, "duplicate response option label");
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::option::OptionColor;
    use chrono::Duration;

    fn make_event(created_by: Uuid) -> Event {
        Event {
            id: EventId::new(),
            team_id: Uuid::new_v4(),
            title: "Scrimmage".to_string(),
            date: Utc::now() + Duration::days(1),
            location: "Hall B".to_string(),
            capacity: 8,
            description: None,
            response_options: vec![ResponseOption::new(1, "Going", true, OptionColor::Green)],
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn creator_can_manage_without_role() {
        let creator = Uuid::new_v4();
        let event = make_event(creator);
        assert!(can_manage_event(&event, creator, None));
    }

    #[test]
    fn admin_can_manage_foreign_event() {
        let event = make_event(Uuid::new_v4());
        let admin = Uuid::new_v4();
        assert!(can_manage_event(&event, admin, Some(TeamRole::Admin)));
    }

    #[test]
    fn plain_member_cannot_manage_foreign_event() {
        let event = make_event(Uuid::new_v4());
        let member = Uuid::new_v4();
        assert!(!can_manage_event(&event, member, Some(TeamRole::Member)));
        assert!(!can_manage_event(&event, member, None));
    }

    #[test]
    fn empty_title_rejected() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title("Practice").is_ok());
    }

    #[test]
    fn empty_option_list_rejected() {
        assert!(validate_options(&[]).is_err());
        let options = vec![ResponseOption::new(1, "Going", true, OptionColor::Green)];
        assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn duplicate_labels_tolerated() {
        let options = vec![
            ResponseOption::new(1, "Going", true, OptionColor::Green),
            ResponseOption::new(2, "Going", false, OptionColor::Red),
        ];
        assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn detail_recomputes_from_snapshot() {
        let event = make_event(Uuid::new_v4());
        let user_id = Uuid::new_v4();
        let response = EventResponse {
            id: Uuid::new_v4(),
            event_id: event.id,
            responder: Responder::Member { user_id },
            response: "Going".to_string(),
            added_by: user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let detail = build_detail(event, vec![response]);
        assert_eq!(detail.capacity.confirmed_count, 1);
        assert_eq!(detail.roster.confirmed.len(), 1);
        assert!(detail.roster.waitlist.is_empty());
        assert_eq!(detail.groups.len(), 1);
    }
}
