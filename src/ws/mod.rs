//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes change notifications for
//! subscribed events. Notifications carry only identifiers; clients
//! refetch the event detail over REST and recompute their view from
//! that snapshot.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
