//! Per-connection subscription filter.
//!
//! Each WebSocket connection holds its own filter: a set of event IDs
//! plus a sticky wildcard bit. Filtering happens server-side so clients
//! only receive notifications for events they actually watch.

use std::collections::HashSet;

use crate::domain::EventId;

/// Subscription filter for a single WebSocket connection.
///
/// The wildcard is sticky: once a client subscribes to `"*"`, explicit
/// unsubscribes narrow only the id set, never the wildcard.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Explicitly subscribed event IDs; shadowed by the wildcard.
    event_ids: HashSet<EventId>,
    /// Sticky all-events flag (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates an empty filter that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds event IDs to the filter; `wildcard` latches the all-events
    /// flag.
    pub fn subscribe(&mut self, ids: &[EventId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.event_ids.extend(ids.iter().copied());
    }

    /// Drops event IDs from the explicit set. Does not clear the
    /// wildcard.
    pub fn unsubscribe(&mut self, ids: &[EventId]) {
        for id in ids {
            self.event_ids.remove(id);
        }
    }

    /// Whether a notification for `event_id` should reach this
    /// connection.
    #[must_use]
    pub fn matches(&self, event_id: EventId) -> bool {
        self.subscribe_all || self.event_ids.contains(&event_id)
    }

    /// Number of explicitly subscribed event IDs (wildcard excluded).
    #[must_use]
    pub fn count(&self) -> usize {
        self.event_ids.len()
    }

    /// Whether the all-events wildcard is latched.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(EventId::new()));
    }

    #[test]
    fn subscribe_specific_event() {
        let mut mgr = SubscriptionManager::new();
        let id = EventId::new();
        mgr.subscribe(&[id], false);
        assert!(mgr.matches(id));
        assert!(!mgr.matches(EventId::new()));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(EventId::new()));
        assert!(mgr.matches(EventId::new()));
    }

    #[test]
    fn unsubscribe_removes_event() {
        let mut mgr = SubscriptionManager::new();
        let id = EventId::new();
        mgr.subscribe(&[id], false);
        assert!(mgr.matches(id));
        mgr.unsubscribe(&[id]);
        assert!(!mgr.matches(id));
    }

    #[test]
    fn unsubscribe_does_not_clear_wildcard() {
        let mut mgr = SubscriptionManager::new();
        let id = EventId::new();
        mgr.subscribe(&[id], true);
        mgr.unsubscribe(&[id]);
        assert!(mgr.matches(EventId::new()));
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[EventId::new(), EventId::new()], false);
        assert_eq!(mgr.count(), 2);
    }
}
