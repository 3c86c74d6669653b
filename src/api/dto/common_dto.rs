//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameter identifying the acting user on endpoints without a
/// request body (mainly `DELETE`).
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct ActorParams {
    /// The user performing the operation.
    pub user_id: uuid::Uuid,
}
