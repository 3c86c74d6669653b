//! User profile DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::team::User;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Email address; must be unique.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Request body for `PATCH /users/:id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserNameRequest {
    /// New display name.
    pub name: String,
}

/// User representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
