//! Data Transfer Objects for REST request/response serialization.
//!
//! Responders are flattened to `user_id` / `guest_name` pairs on the
//! wire; exactly one of the two is set per response row.

pub mod common_dto;
pub mod event_dto;
pub mod response_dto;
pub mod team_dto;
pub mod user_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use response_dto::*;
pub use team_dto::*;
pub use user_dto::*;
