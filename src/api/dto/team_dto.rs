//! Team and membership DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::team::{Team, TeamMember, TeamRole};

/// Request body for `POST /teams`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    /// Team name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creating user; becomes the first admin.
    pub created_by: uuid::Uuid,
}

/// Request body for `PATCH /teams/:id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTeamRequest {
    /// Acting user; must be a team admin.
    pub requester: uuid::Uuid,
    /// New team name.
    pub name: String,
    /// New description (omit to clear).
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /teams/join`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinTeamRequest {
    /// Invite code shared by a team admin.
    pub invite_code: String,
    /// Joining user.
    pub user_id: uuid::Uuid,
}

/// Request body for `POST /teams/:id/leave`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveTeamRequest {
    /// Leaving user.
    pub user_id: uuid::Uuid,
}

/// Request body for `PATCH /teams/:id/members/:member_id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    /// Acting user; must be a team admin.
    pub requester: uuid::Uuid,
    /// New role for the member.
    pub role: TeamRole,
}

/// Team representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamDto {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Team name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Shareable invite code.
    pub invite_code: String,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamDto {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            invite_code: team.invite_code,
            created_by: team.created_by,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Membership representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberDto {
    /// Membership identifier.
    pub id: uuid::Uuid,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// The member's user ID.
    pub user_id: uuid::Uuid,
    /// Role within the team.
    pub role: TeamRole,
    /// Join timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<TeamMember> for MemberDto {
    fn from(member: TeamMember) -> Self {
        Self {
            id: member.id,
            team_id: member.team_id,
            user_id: member.user_id,
            role: member.role,
            created_at: member.created_at,
        }
    }
}

/// Response body for `POST /teams/join`.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinTeamResponse {
    /// The joined team.
    pub team: TeamDto,
    /// The newly created membership.
    pub member: MemberDto,
}
