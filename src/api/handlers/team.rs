//! Team handlers: CRUD, invite-code joining, and membership management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    ActorParams, ChangeRoleRequest, CreateTeamRequest, JoinTeamRequest, JoinTeamResponse,
    LeaveTeamRequest, MemberDto, TeamDto, UpdateTeamRequest,
};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /teams` — Create a team.
///
/// # Errors
///
/// Returns [`ApiError`] on validation failure.
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "Teams",
    summary = "Create a team",
    description = "Creates a team with a generated invite code; the creator becomes the first admin.",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state
        .team_service
        .create_team(req.name, req.description, req.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(TeamDto::from(team))))
}

/// `GET /teams/:id` — Get a team.
///
/// # Errors
///
/// Returns [`ApiError::TeamNotFound`] if the team does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Get a team",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 200, description = "Team details", body = TeamDto),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state.team_service.get_team(id).await?;
    Ok(Json(TeamDto::from(team)))
}

/// `PATCH /teams/:id` — Update a team (admins only).
///
/// # Errors
///
/// Returns [`ApiError`] on missing team or missing permission.
#[utoipa::path(
    patch,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Update a team",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamDto),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let team = state
        .team_service
        .update_team(id, req.requester, req.name, req.description)
        .await?;
    Ok(Json(TeamDto::from(team)))
}

/// `DELETE /teams/:id` — Delete a team (admins only).
///
/// # Errors
///
/// Returns [`ApiError`] on missing team or missing permission.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Delete a team",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
        ActorParams,
    ),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(actor): Query<ActorParams>,
) -> Result<impl IntoResponse, ApiError> {
    state.team_service.delete_team(id, actor.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /teams/join` — Join a team via invite code.
///
/// # Errors
///
/// Returns [`ApiError`] on an unknown code or duplicate membership.
#[utoipa::path(
    post,
    path = "/api/v1/teams/join",
    tag = "Teams",
    summary = "Join a team by invite code",
    description = "Looks up the team by invite code and adds the caller as a regular member.",
    request_body = JoinTeamRequest,
    responses(
        (status = 201, description = "Joined the team", body = JoinTeamResponse),
        (status = 404, description = "Invite code not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
    )
)]
pub async fn join_team(
    State(state): State<AppState>,
    Json(req): Json<JoinTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (team, member) = state
        .team_service
        .join_team(&req.invite_code, req.user_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(JoinTeamResponse {
            team: team.into(),
            member: member.into(),
        }),
    ))
}

/// `POST /teams/:id/leave` — Leave a team.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] if the caller is not a member.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{id}/leave",
    tag = "Teams",
    summary = "Leave a team",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    request_body = LeaveTeamRequest,
    responses(
        (status = 204, description = "Left the team"),
        (status = 403, description = "Not a member", body = ErrorResponse),
    )
)]
pub async fn leave_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<LeaveTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.team_service.leave_team(id, req.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /teams/:id/members` — List a team's memberships.
///
/// # Errors
///
/// Returns [`ApiError::TeamNotFound`] if the team does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}/members",
    tag = "Teams",
    summary = "List team members",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 200, description = "Memberships in join order", body = Vec<MemberDto>),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let members = state.team_service.list_members(id).await?;
    let dtos: Vec<MemberDto> = members.into_iter().map(Into::into).collect();
    Ok(Json(dtos))
}

/// `DELETE /teams/:id/members/:member_id` — Remove a member (admins only).
///
/// # Errors
///
/// Returns [`ApiError`] on missing membership or missing permission.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}/members/{member_id}",
    tag = "Teams",
    summary = "Remove a member",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
        ("member_id" = uuid::Uuid, Path, description = "Membership UUID"),
        ActorParams,
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(uuid::Uuid, uuid::Uuid)>,
    Query(actor): Query<ActorParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .team_service
        .remove_member(id, member_id, actor.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /teams/:id/members/:member_id` — Change a member's role
/// (admins only).
///
/// # Errors
///
/// Returns [`ApiError`] on missing membership or missing permission.
#[utoipa::path(
    patch,
    path = "/api/v1/teams/{id}/members/{member_id}",
    tag = "Teams",
    summary = "Change a member's role",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
        ("member_id" = uuid::Uuid, Path, description = "Membership UUID"),
    ),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = MemberDto),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn change_role(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(uuid::Uuid, uuid::Uuid)>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member = state
        .team_service
        .change_role(id, member_id, req.requester, req.role)
        .await?;
    Ok(Json(MemberDto::from(member)))
}

/// Team and membership routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams", post(create_team))
        .route("/teams/join", post(join_team))
        .route(
            "/teams/{id}",
            get(get_team).patch(update_team).delete(delete_team),
        )
        .route("/teams/{id}/leave", post(leave_team))
        .route("/teams/{id}/members", get(list_members))
        .route(
            "/teams/{id}/members/{member_id}",
            patch(change_role).delete(remove_member),
        )
}
