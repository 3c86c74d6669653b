//! Team service: team lifecycle, invite codes, and membership management.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::team::{Team, TeamMember, TeamRole, User, generate_invite_code};
use crate::error::ApiError;
use crate::persistence::PostgresStore;

/// Orchestration layer for teams, memberships, and user profiles.
///
/// Team and membership changes are not event-scoped, so they do not feed
/// the change bus; clients poll team lists on navigation.
#[derive(Debug, Clone)]
pub struct TeamService {
    store: PostgresStore,
}

impl TeamService {
    /// Creates a new `TeamService`.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Registers a new user profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on an empty name, an invalid email, or a
    /// duplicate email address.
    pub async fn register_user(&self, email: String, name: String) -> Result<User, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "name must not be empty".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(ApiError::InvalidRequest(format!(
                "invalid email address: {email}"
            )));
        }
        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken(email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Updates a user's display name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on an empty name or unknown user.
    pub async fn update_user_name(&self, user_id: Uuid, name: String) -> Result<User, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "name must not be empty".to_string(),
            ));
        }
        if !self.store.update_user_name(user_id, name.trim()).await? {
            return Err(ApiError::UserNotFound(user_id));
        }
        self.store
            .get_user(user_id)
            .await?
            .ok_or(ApiError::UserNotFound(user_id))
    }

    /// Creates a team with a fresh invite code; the creator joins as
    /// admin.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on an empty team name or storage failure.
    pub async fn create_team(
        &self,
        name: String,
        description: Option<String>,
        created_by: Uuid,
    ) -> Result<Team, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "team name must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description,
            invite_code: generate_invite_code(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_team(&team).await?;

        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id: team.id,
            user_id: created_by,
            role: TeamRole::Admin,
            created_at: now,
        };
        self.store.insert_member(&member).await?;

        tracing::info!(team_id = %team.id, invite_code = %team.invite_code, "team created");
        Ok(team)
    }

    /// Fetches a team by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TeamNotFound`] if the team does not exist.
    pub async fn get_team(&self, team_id: Uuid) -> Result<Team, ApiError> {
        self.store
            .get_team(team_id)
            .await?
            .ok_or(ApiError::TeamNotFound(team_id))
    }

    /// Lists the teams a user belongs to, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn list_user_teams(&self, user_id: Uuid) -> Result<Vec<Team>, ApiError> {
        self.store.list_user_teams(user_id).await
    }

    /// Updates a team's name and description (admins only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing team, missing permission, or an
    /// empty name.
    pub async fn update_team(
        &self,
        team_id: Uuid,
        requester: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Team, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "team name must not be empty".to_string(),
            ));
        }
        self.require_admin(team_id, requester).await?;
        self.store
            .update_team(team_id, name.trim(), description.as_deref())
            .await?;
        self.get_team(team_id).await
    }

    /// Deletes a team and everything under it (admins only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing team or missing permission.
    pub async fn delete_team(&self, team_id: Uuid, requester: Uuid) -> Result<(), ApiError> {
        self.require_admin(team_id, requester).await?;
        if !self.store.delete_team(team_id).await? {
            return Err(ApiError::TeamNotFound(team_id));
        }
        tracing::info!(%team_id, "team deleted");
        Ok(())
    }

    /// Joins a team via invite code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on an unknown code or duplicate membership.
    pub async fn join_team(
        &self,
        invite_code: &str,
        user_id: Uuid,
    ) -> Result<(Team, TeamMember), ApiError> {
        let code = invite_code.trim().to_uppercase();
        let team = self
            .store
            .get_team_by_invite_code(&code)
            .await?
            .ok_or_else(|| ApiError::InviteCodeNotFound(code))?;

        if self.store.get_membership(team.id, user_id).await?.is_some() {
            return Err(ApiError::AlreadyMember(team.id));
        }

        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id: team.id,
            user_id,
            role: TeamRole::Member,
            created_at: Utc::now(),
        };
        self.store.insert_member(&member).await?;

        tracing::info!(team_id = %team.id, %user_id, "member joined via invite code");
        Ok((team, member))
    }

    /// Leaves a team.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] if the user is not a member.
    pub async fn leave_team(&self, team_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let membership = self
            .store
            .get_membership(team_id, user_id)
            .await?
            .ok_or_else(|| ApiError::Forbidden("not a member of this team".to_string()))?;
        self.store.delete_member(membership.id).await?;
        tracing::info!(%team_id, %user_id, "member left team");
        Ok(())
    }

    /// Lists a team's memberships in join order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TeamNotFound`] if the team does not exist.
    pub async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMember>, ApiError> {
        if self.store.get_team(team_id).await?.is_none() {
            return Err(ApiError::TeamNotFound(team_id));
        }
        self.store.list_members(team_id).await
    }

    /// Removes another member from a team (admins only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing membership or missing permission.
    pub async fn remove_member(
        &self,
        team_id: Uuid,
        member_id: Uuid,
        requester: Uuid,
    ) -> Result<(), ApiError> {
        self.require_admin(team_id, requester).await?;
        let member = self
            .store
            .get_member(member_id)
            .await?
            .filter(|m| m.team_id == team_id)
            .ok_or_else(|| ApiError::Forbidden("no such membership in this team".to_string()))?;
        self.store.delete_member(member.id).await?;
        tracing::info!(%team_id, %member_id, "member removed");
        Ok(())
    }

    /// Changes a member's role (admins only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on missing membership or missing permission.
    pub async fn change_role(
        &self,
        team_id: Uuid,
        member_id: Uuid,
        requester: Uuid,
        role: TeamRole,
    ) -> Result<TeamMember, ApiError> {
        self.require_admin(team_id, requester).await?;
        let member = self
            .store
            .get_member(member_id)
            .await?
            .filter(|m| m.team_id == team_id)
            .ok_or_else(|| ApiError::Forbidden("no such membership in this team".to_string()))?;
        self.store.update_member_role(member.id, role).await?;
        tracing::info!(%team_id, %member_id, role = role.as_str(), "member role changed");
        Ok(TeamMember { role, ..member })
    }

    /// Checks that `requester` holds the admin role in `team_id`.
    async fn require_admin(&self, team_id: Uuid, requester: Uuid) -> Result<(), ApiError> {
        if self.store.get_team(team_id).await?.is_none() {
            return Err(ApiError::TeamNotFound(team_id));
        }
        let membership = self.store.get_membership(team_id, requester).await?;
        if membership.is_some_and(|m| m.role == TeamRole::Admin) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "admin role required".to_string(),
            ))
        }
    }
}
