//! Gateway error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! The capacity aggregator itself never produces errors — everything here
//! belongs to the surrounding application layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: title must not be empty",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (1xxx validation, 2xxx not-found/conflict,
    /// 3xxx server, 4xxx permission/state).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                  |
/// |-----------|---------------------|------------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request              |
/// | 2000–2999 | Not Found / Conflict| 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server              | 500 Internal Server Error    |
/// | 4000–4999 | Permission / State  | 403 Forbidden / 409 Conflict |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed (empty title, no response options, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(uuid::Uuid),

    /// Team with the given ID was not found.
    #[error("team not found: {0}")]
    TeamNotFound(uuid::Uuid),

    /// Response row with the given ID was not found.
    #[error("response not found: {0}")]
    ResponseNotFound(uuid::Uuid),

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// No team matches the given invite code.
    #[error("no team with invite code {0:?}")]
    InviteCodeNotFound(String),

    /// User is already a member of the team.
    #[error("user is already a member of team {0}")]
    AlreadyMember(uuid::Uuid),

    /// Email address is already registered.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// Caller is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The event's date has passed; it is read-only.
    #[error("event {0} has already taken place and is read-only")]
    EventClosed(crate::domain::EventId),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::TeamNotFound(_) => 2002,
            Self::ResponseNotFound(_) => 2003,
            Self::UserNotFound(_) => 2004,
            Self::InviteCodeNotFound(_) => 2005,
            Self::AlreadyMember(_) => 2101,
            Self::EmailTaken(_) => 2102,
            Self::Forbidden(_) => 4001,
            Self::EventClosed(_) => 4002,
            Self::Storage(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_)
            | Self::TeamNotFound(_)
            | Self::ResponseNotFound(_)
            | Self::UserNotFound(_)
            | Self::InviteCodeNotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyMember(_) | Self::EmailTaken(_) | Self::EventClosed(_) => {
                StatusCode::CONFLICT
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::InvalidRequest("title must not be empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::EventNotFound(uuid::Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn closed_event_maps_to_conflict() {
        let err = ApiError::EventClosed(crate::domain::EventId::new());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 4002);
    }

    #[test]
    fn storage_maps_to_500() {
        let err = ApiError::Storage("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
