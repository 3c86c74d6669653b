//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ChangeBus;
use crate::service::{EventService, TeamService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event and response business logic.
    pub event_service: Arc<EventService>,
    /// Team, membership, and user business logic.
    pub team_service: Arc<TeamService>,
    /// Change bus for WebSocket subscriptions.
    pub change_bus: ChangeBus,
}
