//! Service layer: business logic orchestration.
//!
//! [`EventService`] coordinates event and response operations, delegates
//! aggregation to [`super::domain::capacity`], and emits notifications
//! through the [`super::domain::ChangeBus`]. [`TeamService`] manages
//! teams, memberships, and user profiles.

pub mod event_service;
pub mod team_service;

pub use event_service::EventService;
pub use team_service::TeamService;
