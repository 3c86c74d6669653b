//! Event DTOs: creation, patching, and the aggregated detail view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::response_dto::ResponseDto;
use crate::domain::capacity::CapacityState;
use crate::domain::{Event, ResponseOption};
use crate::service::event_service::EventDetail;

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Event title.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Maximum confirmed attendees; `0` means unlimited.
    #[serde(default)]
    pub capacity: u32,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered response options; at least one required.
    pub response_options: Vec<ResponseOption>,
    /// Creating user.
    pub created_by: uuid::Uuid,
}

/// Request body for `PATCH /events/:id`. Omitted fields are unchanged;
/// an explicit `"description": null` clears the description.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// Acting user; must be the creator or a team admin.
    pub requester: uuid::Uuid,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
    /// New capacity.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Replacement option list.
    #[serde(default)]
    pub response_options: Option<Vec<ResponseOption>>,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Event representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDto {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Location.
    pub location: String,
    /// Declared capacity (`0` = unlimited).
    pub capacity: u32,
    /// Optional description.
    pub description: Option<String>,
    /// Declared response options in display order.
    pub response_options: Vec<ResponseOption>,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            team_id: event.team_id,
            title: event.title,
            date: event.date,
            location: event.location,
            capacity: event.capacity,
            description: event.description,
            response_options: event.response_options,
            created_by: event.created_by,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Derived capacity facts for badges and progress bars.
#[derive(Debug, Serialize, ToSchema)]
pub struct CapacityDto {
    /// Responses whose label counts toward capacity.
    pub confirmed_count: usize,
    /// Declared capacity (`0` = unlimited).
    pub capacity: u32,
    /// `true` when capacity is unlimited.
    pub is_unlimited: bool,
    /// `true` when limited and at or over capacity.
    pub is_full: bool,
    /// Fill percentage clamped to 0..=100.
    pub percentage: u8,
}

impl From<CapacityState> for CapacityDto {
    fn from(state: CapacityState) -> Self {
        Self {
            confirmed_count: state.confirmed_count,
            capacity: state.capacity,
            is_unlimited: state.is_unlimited,
            is_full: state.is_full,
            percentage: state.percentage,
        }
    }
}

/// One declared option with its matching responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct OptionGroupDto {
    /// The option as declared on the event.
    pub option: ResponseOption,
    /// Responses whose label equals the option's label.
    pub respondents: Vec<ResponseDto>,
}

/// Full aggregated event view for `GET /events/:id`.
///
/// Everything derived is recomputed server-side from the current
/// snapshot on every fetch.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    /// The event configuration.
    pub event: EventDto,
    /// All responses, oldest first.
    pub responses: Vec<ResponseDto>,
    /// Derived capacity facts.
    pub capacity: CapacityDto,
    /// Responses admitted within capacity, FIFO.
    pub confirmed: Vec<ResponseDto>,
    /// Responses beyond capacity, FIFO.
    pub waitlist: Vec<ResponseDto>,
    /// Responses grouped under each declared option.
    pub groups: Vec<OptionGroupDto>,
}

impl From<EventDetail> for EventDetailResponse {
    fn from(detail: EventDetail) -> Self {
        Self {
            event: detail.event.into(),
            responses: detail.responses.into_iter().map(Into::into).collect(),
            capacity: detail.capacity.into(),
            confirmed: detail.roster.confirmed.into_iter().map(Into::into).collect(),
            waitlist: detail.roster.waitlist.into_iter().map(Into::into).collect(),
            groups: detail
                .groups
                .into_iter()
                .map(|g| OptionGroupDto {
                    option: g.option,
                    respondents: g.respondents.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_from_null_description() {
        let absent: UpdateEventRequest =
            match serde_json::from_value(serde_json::json!({ "requester": uuid::Uuid::new_v4() }))
            {
                Ok(req) => req,
                Err(e) => panic!("absent description must parse: {e}"),
            };
        assert_eq!(absent.description, None);

        let cleared: UpdateEventRequest = match serde_json::from_value(serde_json::json!({
            "requester": uuid::Uuid::new_v4(),
            "description": null
        })) {
            Ok(req) => req,
            Err(e) => panic!("null description must parse: {e}"),
        };
        assert_eq!(cleared.description, Some(None));

        let set: UpdateEventRequest = match serde_json::from_value(serde_json::json!({
            "requester": uuid::Uuid::new_v4(),
            "description": "bring cleats"
        })) {
            Ok(req) => req,
            Err(e) => panic!("string description must parse: {e}"),
        };
        assert_eq!(set.description, Some(Some("bring cleats".to_string())));
    }
}
