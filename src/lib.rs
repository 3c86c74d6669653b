//! # rsvp-gateway
//!
//! REST API and WebSocket gateway for team event RSVP coordination.
//!
//! Teams schedule events with configurable response options and an
//! optional capacity; members answer, add guests, and watch a live
//! roster. All aggregation — confirmed counts, the FIFO
//! confirmed/waitlist split, per-option grouping — is recomputed from
//! the current snapshot on every read. Change notifications carry only
//! identifiers; clients refetch and recompute rather than patch state
//! incrementally.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── EventService / TeamService (service/)
//!     ├── ChangeBus (domain/)
//!     │
//!     ├── capacity aggregation (domain/)
//!     │
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
