//! rsvp-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rsvp_gateway::api;
use rsvp_gateway::app_state::AppState;
use rsvp_gateway::config::GatewayConfig;
use rsvp_gateway::domain::ChangeBus;
use rsvp_gateway::persistence::PostgresStore;
use rsvp_gateway::service::{EventService, TeamService};
use rsvp_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting rsvp-gateway");

    // Connect storage and run migrations
    let store = PostgresStore::connect(&config).await?;

    // Build domain and service layers
    let change_bus = ChangeBus::new(config.change_bus_capacity);
    let event_service = Arc::new(EventService::new(store.clone(), change_bus.clone()));
    let team_service = Arc::new(TeamService::new(store));

    // Build application state
    let app_state = AppState {
        event_service,
        team_service,
        change_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            config.request_timeout_secs,
        )))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
