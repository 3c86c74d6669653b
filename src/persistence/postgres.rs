//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::domain::response::Responder;
use crate::domain::team::{Team, TeamMember, TeamRole, User};
use crate::domain::{Event, EventId, EventResponse, ResponseOption};
use crate::error::ApiError;

/// Row tuple for the `events` table.
type EventRow = (
    Uuid,
    Uuid,
    String,
    DateTime<Utc>,
    String,
    i32,
    Option<String>,
    serde_json::Value,
    Uuid,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Row tuple for the `event_responses` table.
type ResponseRow = (
    Uuid,
    Uuid,
    Option<Uuid>,
    Option<String>,
    String,
    Uuid,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Row tuple for the `teams` table.
type TeamRow = (
    Uuid,
    String,
    Option<String>,
    String,
    Uuid,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Row tuple for the `team_members` table.
type MemberRow = (Uuid, Uuid, Uuid, String, DateTime<Utc>);

const EVENT_COLUMNS: &str = "id, team_id, title, date, location, capacity, description, \
     response_options, created_by, created_at, updated_at";

const RESPONSE_COLUMNS: &str =
    "id, event_id, user_id, guest_name, response, added_by, created_at, updated_at";

const TEAM_COLUMNS: &str = "id, name, description, invite_code, created_by, created_at, updated_at";

/// PostgreSQL-backed record store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database described by `config` and runs pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the connection or a migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        Ok(Self::new(pool))
    }

    // ── Users ───────────────────────────────────────────────────────────

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure (including a
    /// duplicate email, which callers should pre-check).
    pub async fn insert_user(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, email, name, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    /// Fetches a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, email, name, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    /// Updates a user's display name, returning whether a row was touched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn update_user_name(&self, id: Uuid, name: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("UPDATE users SET name = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Teams ───────────────────────────────────────────────────────────

    /// Inserts a new team.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn insert_team(&self, team: &Team) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO teams (id, name, description, invite_code, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.description)
        .bind(&team.invite_code)
        .bind(team.created_by)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetches a team by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_team(&self, id: Uuid) -> Result<Option<Team>, ApiError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(team_from_row))
    }

    /// Fetches a team by invite code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_team_by_invite_code(&self, code: &str) -> Result<Option<Team>, ApiError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE invite_code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(team_from_row))
    }

    /// Lists the teams a user belongs to, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn list_user_teams(&self, user_id: Uuid) -> Result<Vec<Team>, ApiError> {
        let rows = sqlx::query_as::<_, TeamRow>(
            "SELECT t.id, t.name, t.description, t.invite_code, t.created_by, \
             t.created_at, t.updated_at \
             FROM teams t JOIN team_members m ON m.team_id = t.id \
             WHERE m.user_id = $1 ORDER BY t.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(team_from_row).collect())
    }

    /// Updates a team's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn update_team(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE teams SET name = $2, description = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a team (cascades to memberships, events, and responses).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn delete_team(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Memberships ─────────────────────────────────────────────────────

    /// Inserts a membership row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn insert_member(&self, member: &TeamMember) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO team_members (id, team_id, user_id, role, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(member.id)
        .bind(member.team_id)
        .bind(member.user_id)
        .bind(member.role.as_str())
        .bind(member.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetches the membership of a user within a team, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMember>, ApiError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, team_id, user_id, role, created_at FROM team_members \
             WHERE team_id = $1 AND user_id = $2",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(member_from_row))
    }

    /// Fetches a membership row by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_member(&self, member_id: Uuid) -> Result<Option<TeamMember>, ApiError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, team_id, user_id, role, created_at FROM team_members WHERE id = $1",
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(member_from_row))
    }

    /// Lists a team's memberships in join order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMember>, ApiError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, team_id, user_id, role, created_at FROM team_members \
             WHERE team_id = $1 ORDER BY created_at ASC",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(member_from_row).collect())
    }

    /// Deletes a membership row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn delete_member(&self, member_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Updates a membership's role.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn update_member_role(
        &self,
        member_id: Uuid,
        role: TeamRole,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query("UPDATE team_members SET role = $2 WHERE id = $1")
            .bind(member_id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Inserts a new event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn insert_event(&self, event: &Event) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO events (id, team_id, title, date, location, capacity, description, \
             response_options, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(*event.id.as_uuid())
        .bind(event.team_id)
        .bind(&event.title)
        .bind(event.date)
        .bind(&event.location)
        .bind(capacity_to_db(event.capacity))
        .bind(&event.description)
        .bind(serde_json::to_value(&event.response_options).unwrap_or_default())
        .bind(event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetches an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_event(&self, id: EventId) -> Result<Option<Event>, ApiError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(event_from_row))
    }

    /// Lists a team's events, newest date first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn list_team_events(&self, team_id: Uuid) -> Result<Vec<Event>, ApiError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE team_id = $1 ORDER BY date DESC"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(event_from_row).collect())
    }

    /// Rewrites an event's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn update_event(&self, event: &Event) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE events SET title = $2, date = $3, location = $4, capacity = $5, \
             description = $6, response_options = $7, updated_at = now() WHERE id = $1",
        )
        .bind(*event.id.as_uuid())
        .bind(&event.title)
        .bind(event.date)
        .bind(&event.location)
        .bind(capacity_to_db(event.capacity))
        .bind(&event.description)
        .bind(serde_json::to_value(&event.response_options).unwrap_or_default())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes an event (cascades to its responses).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Responses ───────────────────────────────────────────────────────

    /// Lists all responses for an event, oldest first.
    ///
    /// The ascending `created_at` order matches the FIFO admission policy;
    /// the aggregator re-sorts anyway, so the split never depends on
    /// store ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn list_event_responses(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventResponse>, ApiError> {
        let rows = sqlx::query_as::<_, ResponseRow>(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM event_responses \
             WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(*event_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(response_from_row).collect())
    }

    /// Fetches a user's own response to an event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn find_user_response(
        &self,
        event_id: EventId,
        user_id: Uuid,
    ) -> Result<Option<EventResponse>, ApiError> {
        let row = sqlx::query_as::<_, ResponseRow>(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM event_responses \
             WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(*event_id.as_uuid())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(response_from_row))
    }

    /// Fetches a response row by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn get_response(&self, id: Uuid) -> Result<Option<EventResponse>, ApiError> {
        let row = sqlx::query_as::<_, ResponseRow>(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM event_responses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(response_from_row))
    }

    /// Inserts a response row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn insert_response(&self, response: &EventResponse) -> Result<(), ApiError> {
        let (user_id, guest_name) = match &response.responder {
            Responder::Member { user_id } => (Some(*user_id), None),
            Responder::Guest { name } => (None, Some(name.as_str())),
        };
        sqlx::query(
            "INSERT INTO event_responses (id, event_id, user_id, guest_name, response, \
             added_by, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(response.id)
        .bind(*response.event_id.as_uuid())
        .bind(user_id)
        .bind(guest_name)
        .bind(&response.response)
        .bind(response.added_by)
        .bind(response.created_at)
        .bind(response.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Updates the label of an existing response row in place.
    ///
    /// Per-record last-write-wins: concurrent writers are resolved by
    /// whichever UPDATE lands last.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn update_response_label(&self, id: Uuid, label: &str) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE event_responses SET response = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(label)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a response row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn delete_response(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM event_responses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn capacity_to_db(capacity: u32) -> i32 {
    i32::try_from(capacity).unwrap_or(i32::MAX)
}

fn user_from_row(row: (Uuid, String, String, DateTime<Utc>, DateTime<Utc>)) -> User {
    let (id, email, name, created_at, updated_at) = row;
    User {
        id,
        email,
        name,
        created_at,
        updated_at,
    }
}

fn team_from_row(row: TeamRow) -> Team {
    let (id, name, description, invite_code, created_by, created_at, updated_at) = row;
    Team {
        id,
        name,
        description,
        invite_code,
        created_by,
        created_at,
        updated_at,
    }
}

fn member_from_row(row: MemberRow) -> TeamMember {
    let (id, team_id, user_id, role, created_at) = row;
    TeamMember {
        id,
        team_id,
        user_id,
        role: TeamRole::from_str_lossy(&role),
        created_at,
    }
}

fn event_from_row(row: EventRow) -> Event {
    let (
        id,
        team_id,
        title,
        date,
        location,
        capacity,
        description,
        options_json,
        created_by,
        created_at,
        updated_at,
    ) = row;

    // Unparseable option JSON degrades to an empty option list; responses
    // then simply stop being counted (same tolerance as label drift).
    let response_options: Vec<ResponseOption> =
        serde_json::from_value(options_json).unwrap_or_default();

    Event {
        id: EventId::from_uuid(id),
        team_id,
        title,
        date,
        location,
        capacity: u32::try_from(capacity).unwrap_or(0),
        description,
        response_options,
        created_by,
        created_at,
        updated_at,
    }
}

fn response_from_row(row: ResponseRow) -> EventResponse {
    let (id, event_id, user_id, guest_name, response, added_by, created_at, updated_at) = row;
    let responder = match user_id {
        Some(user_id) => Responder::Member { user_id },
        None => Responder::Guest {
            name: guest_name.unwrap_or_default(),
        },
    };
    EventResponse {
        id,
        event_id: EventId::from_uuid(event_id),
        responder,
        response,
        added_by,
        created_at,
        updated_at,
    }
}
