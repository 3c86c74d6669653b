//! Fan-out channel for change notifications.
//!
//! The services publish a [`ChangeEvent`] after every event-scoped
//! mutation; each WebSocket connection holds a receiver and filters by
//! subscription. Losing a notification is harmless: receivers treat any
//! notification as "refetch the snapshot", so a dropped one at worst
//! delays a refresh until the next change.

use tokio::sync::broadcast;

use super::ChangeEvent;

/// Cloneable handle to the notification channel.
///
/// Wraps a [`broadcast::Sender`] with a fixed ring-buffer capacity.
/// Lagging receivers lose the oldest notifications first.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    /// Creates a bus whose ring buffer holds `capacity` notifications.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a change, returning how many receivers got it.
    ///
    /// With no active receivers the notification is dropped; publishing
    /// is never an error for the mutating caller.
    pub fn publish(&self, change: ChangeEvent) -> usize {
        self.sender.send(change).unwrap_or(0)
    }

    /// Opens a receiver for all future changes. One per WebSocket
    /// connection; dropping it unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Current number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventId;
    use chrono::Utc;

    fn make_change(event_id: EventId) -> ChangeEvent {
        ChangeEvent::EventUpdated {
            event_id,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = ChangeBus::new(100);
        let count = bus.publish(make_change(EventId::new()));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_change() {
        let bus = ChangeBus::new(100);
        let mut rx = bus.subscribe();

        let id = EventId::new();
        bus.publish(make_change(id));

        let change = rx.recv().await;
        let Ok(change) = change else {
            panic!("expected to receive change");
        };
        assert_eq!(change.event_id(), id);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_change() {
        let bus = ChangeBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let id = EventId::new();
        let count = bus.publish(make_change(id));
        assert_eq!(count, 2);

        let c1 = rx1.recv().await;
        let c2 = rx2.recv().await;
        let Ok(c1) = c1 else {
            panic!("rx1 failed");
        };
        let Ok(c2) = c2 else {
            panic!("rx2 failed");
        };
        assert_eq!(c1.event_id(), c2.event_id());
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = ChangeBus::new(100);
        assert_eq!(bus.receiver_count(), 0);

        let _rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(_rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}
