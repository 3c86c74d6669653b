//! Domain layer: data model, capacity aggregation, and the change feed.
//!
//! This module contains the pure heart of the service: the event/response
//! data model, the capacity and roster aggregation functions, and the
//! change bus that broadcasts mutation notifications to subscribers.

pub mod capacity;
pub mod change;
pub mod change_bus;
pub mod event;
pub mod event_id;
pub mod option;
pub mod response;
pub mod team;

pub use change::ChangeEvent;
pub use change_bus::ChangeBus;
pub use event::Event;
pub use event_id::EventId;
pub use option::ResponseOption;
pub use response::EventResponse;
