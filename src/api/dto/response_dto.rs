//! Response and guest DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::EventResponse;
use crate::domain::response::Responder;

/// Request body for `PUT /events/:id/response`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetResponseRequest {
    /// Responding user.
    pub user_id: uuid::Uuid,
    /// Selected option label.
    pub response: String,
}

/// Request body for `POST /events/:id/guests`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddGuestRequest {
    /// Member adding the guest.
    pub added_by: uuid::Uuid,
    /// Guest display name.
    pub guest_name: String,
    /// Selected option label.
    pub response: String,
}

/// Response row representation; exactly one of `user_id` / `guest_name`
/// is set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResponseDto {
    /// Response row identifier.
    pub id: uuid::Uuid,
    /// Owning event.
    pub event_id: uuid::Uuid,
    /// Responding user, when the row belongs to a member.
    pub user_id: Option<uuid::Uuid>,
    /// Guest name, when the row is a guest entry.
    pub guest_name: Option<String>,
    /// Chosen option label.
    pub response: String,
    /// User who created the row.
    pub added_by: uuid::Uuid,
    /// Creation timestamp (FIFO admission order).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<EventResponse> for ResponseDto {
    fn from(row: EventResponse) -> Self {
        let (user_id, guest_name) = match row.responder {
            Responder::Member { user_id } => (Some(user_id), None),
            Responder::Guest { name } => (None, Some(name)),
        };
        Self {
            id: row.id,
            event_id: *row.event_id.as_uuid(),
            user_id,
            guest_name,
            response: row.response,
            added_by: row.added_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
