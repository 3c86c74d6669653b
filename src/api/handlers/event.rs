//! Event handlers: create, list, get, patch, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ActorParams, CreateEventRequest, EventDetailResponse, EventDto, UpdateEventRequest,
};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ApiError, ErrorResponse};
use crate::service::event_service::{EventPatch, NewEvent};

/// `POST /events` — Create an event.
///
/// # Errors
///
/// Returns [`ApiError`] on validation failure, unknown team, or missing
/// membership.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Creates an event for a team. Capacity 0 means unlimited; at least one response option is required.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not a team member", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .event_service
        .create_event(NewEvent {
            team_id: req.team_id,
            title: req.title,
            date: req.date,
            location: req.location,
            capacity: req.capacity,
            description: req.description,
            response_options: req.response_options,
            created_by: req.created_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(EventDto::from(event))))
}

/// `GET /teams/:id/events` — List a team's events with capacity facts.
///
/// # Errors
///
/// Returns [`ApiError::TeamNotFound`] if the team does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}/events",
    tag = "Events",
    summary = "List a team's events",
    description = "Returns every event of the team, newest date first, each with its full aggregated detail.",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 200, description = "Event list", body = Vec<EventDetailResponse>),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn list_team_events(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state.event_service.list_team_events(id).await?;
    let dtos: Vec<EventDetailResponse> = details.into_iter().map(Into::into).collect();
    Ok(Json(dtos))
}

/// `GET /events/:id` — Get an event with all derived aggregation facts.
///
/// # Errors
///
/// Returns [`ApiError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event detail",
    description = "Returns the event plus its responses, capacity state, FIFO confirmed/waitlist split, and per-option groups, all recomputed from the current snapshot.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Aggregated event detail", body = EventDetailResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.event_service.get_event(EventId::from_uuid(id)).await?;
    Ok(Json(EventDetailResponse::from(detail)))
}

/// `PATCH /events/:id` — Update an event (creator or admin).
///
/// # Errors
///
/// Returns [`ApiError`] on missing event, missing permission, or a
/// closed event.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventDto),
        (status = 403, description = "Not creator or admin", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event already closed", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .event_service
        .update_event(
            EventId::from_uuid(id),
            req.requester,
            EventPatch {
                title: req.title,
                date: req.date,
                location: req.location,
                capacity: req.capacity,
                description: req.description,
                response_options: req.response_options,
            },
        )
        .await?;
    Ok(Json(EventDto::from(event)))
}

/// `DELETE /events/:id` — Delete an event (creator or admin).
///
/// # Errors
///
/// Returns [`ApiError`] on missing event, missing permission, or a
/// closed event.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        ActorParams,
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Not creator or admin", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event already closed", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(actor): Query<ActorParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .event_service
        .delete_event(EventId::from_uuid(id), actor.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/teams/{id}/events", get(list_team_events))
}
