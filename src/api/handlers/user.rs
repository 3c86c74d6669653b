//! User profile handlers: registration, name updates, team listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{RegisterUserRequest, TeamDto, UpdateUserNameRequest, UserDto};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /users` — Register a new user profile.
///
/// # Errors
///
/// Returns [`ApiError`] on validation failure or a duplicate email.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Register a user",
    description = "Creates a user profile. Email addresses must be unique.",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.team_service.register_user(req.email, req.name).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// `PATCH /users/:id` — Update a user's display name.
///
/// # Errors
///
/// Returns [`ApiError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Update display name",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    request_body = UpdateUserNameRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn update_user_name(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateUserNameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.team_service.update_user_name(id, req.name).await?;
    Ok(Json(UserDto::from(user)))
}

/// `GET /users/:id/teams` — List the teams a user belongs to.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/teams",
    tag = "Users",
    summary = "List a user's teams",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Teams the user belongs to", body = Vec<TeamDto>),
    )
)]
pub async fn list_user_teams(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let teams = state.team_service.list_user_teams(id).await?;
    let dtos: Vec<TeamDto> = teams.into_iter().map(Into::into).collect();
    Ok(Json(dtos))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/{id}", axum::routing::patch(update_user_name))
        .route("/users/{id}/teams", get(list_user_teams))
}
