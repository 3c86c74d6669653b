//! Response handlers: set own response, add guests, remove rows.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post, put};
use axum::{Json, Router};

use crate::api::dto::{ActorParams, AddGuestRequest, ResponseDto, SetResponseRequest};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ApiError, ErrorResponse};

/// `PUT /events/:id/response` — Set or update the caller's own response.
///
/// # Errors
///
/// Returns [`ApiError`] on missing event, closed event, or missing
/// membership.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}/response",
    tag = "Responses",
    summary = "Set own response",
    description = "Upserts the caller's response row for this event; each user holds at most one row per event.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = SetResponseRequest,
    responses(
        (status = 200, description = "Response recorded", body = ResponseDto),
        (status = 403, description = "Not a team member", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event already closed", body = ErrorResponse),
    )
)]
pub async fn set_response(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SetResponseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .event_service
        .set_response(EventId::from_uuid(id), req.user_id, req.response)
        .await?;
    Ok(Json(ResponseDto::from(response)))
}

/// `POST /events/:id/guests` — Add a guest on behalf of a member.
///
/// # Errors
///
/// Returns [`ApiError`] on an empty guest name, missing event, closed
/// event, or missing membership.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/guests",
    tag = "Responses",
    summary = "Add a guest",
    description = "Creates a guest response row tied to the adding member. Guests are not deduplicated.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = AddGuestRequest,
    responses(
        (status = 201, description = "Guest added", body = ResponseDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not a team member", body = ErrorResponse),
        (status = 409, description = "Event already closed", body = ErrorResponse),
    )
)]
pub async fn add_guest(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<AddGuestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .event_service
        .add_guest(
            EventId::from_uuid(id),
            req.added_by,
            req.guest_name,
            req.response,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ResponseDto::from(response))))
}

/// `DELETE /responses/:id` — Remove a response row.
///
/// Allowed for the responder, the member who added the row, or a team
/// admin.
///
/// # Errors
///
/// Returns [`ApiError`] on missing response, closed event, or missing
/// permission.
#[utoipa::path(
    delete,
    path = "/api/v1/responses/{id}",
    tag = "Responses",
    summary = "Remove a response",
    params(
        ("id" = uuid::Uuid, Path, description = "Response UUID"),
        ActorParams,
    ),
    responses(
        (status = 204, description = "Response removed"),
        (status = 403, description = "Not allowed to remove this response", body = ErrorResponse),
        (status = 404, description = "Response not found", body = ErrorResponse),
        (status = 409, description = "Event already closed", body = ErrorResponse),
    )
)]
pub async fn remove_response(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(actor): Query<ActorParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .event_service
        .remove_response(id, actor.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Response routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/response", put(set_response))
        .route("/events/{id}/guests", post(add_guest))
        .route("/responses/{id}", delete(remove_response))
}
