//! Broadcast event bus for session events.
//!
//! Thin wrapper around [`tokio::sync::broadcast`] that hides the lag
//! bookkeeping from subscribers: a subscriber that falls behind skips the
//! lost events and keeps receiving, instead of having to handle
//! [`RecvError::Lagged`] itself.  Dropped events are almost always stale
//! screen frames, which nobody wants delivered late anyway.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::domain::events::SessionEvent;

/// The publishing side of the session event bus.
///
/// Cloning is cheap and every clone publishes to the same subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a bus with room for `capacity` undelivered events per
    /// subscriber.  A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Publishing with no subscribers is not an error — events are simply
    /// dropped, the same as a log line nobody is tailing.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Opens a new subscription.  The stream sees only events published
    /// after this call.
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            rx: self.tx.subscribe(),
        }
    }
}

/// A subscriber's view of the event bus.
#[derive(Debug)]
pub struct EventStream {
    rx: broadcast::Receiver<SessionEvent>,
}

impl EventStream {
    /// Waits for the next event.
    ///
    /// Returns `None` once every publisher has been dropped, which happens
    /// when the session actor terminates.  Lag is absorbed internally: the
    /// skipped count is logged and the stream resumes at the oldest
    /// retained event.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "event subscriber lagged, resuming");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::new(8);
        let mut stream = bus.subscribe();

        bus.publish(SessionEvent::ConnectionOpened);
        bus.publish(SessionEvent::ConnectionClosed {
            code: 1000,
            reason: "done".to_string(),
        });

        assert_eq!(stream.next().await, Some(SessionEvent::ConnectionOpened));
        assert_eq!(
            stream.next().await,
            Some(SessionEvent::ConnectionClosed {
                code: 1000,
                reason: "done".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_events_before_subscribe_are_not_delivered() {
        let bus = EventBus::new(8);
        bus.publish(SessionEvent::ConnectionOpened);

        let mut stream = bus.subscribe();
        bus.publish(SessionEvent::ConnectionFailed {
            cause: "late".to_string(),
        });

        assert_eq!(
            stream.next().await,
            Some(SessionEvent::ConnectionFailed {
                cause: "late".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_stream_ends_when_bus_is_dropped() {
        let bus = EventBus::new(8);
        let mut stream = bus.subscribe();
        drop(bus);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_skips_and_resumes() {
        let bus = EventBus::new(2);
        let mut stream = bus.subscribe();

        // Overflow the two-slot buffer; the oldest events are lost.
        for code in 0..5u16 {
            bus.publish(SessionEvent::ConnectionClosed {
                code,
                reason: String::new(),
            });
        }

        // The stream resumes at the oldest retained event instead of
        // erroring out.
        match stream.next().await {
            Some(SessionEvent::ConnectionClosed { code, .. }) => assert!(code >= 3),
            other => panic!("expected a ConnectionClosed event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers_is_a_no_op() {
        let bus = EventBus::new(4);
        bus.publish(SessionEvent::ConnectionOpened);
        // No panic, no error — and a later subscriber starts clean.
        let mut stream = bus.subscribe();
        bus.publish(SessionEvent::ConnectionOpened);
        assert_eq!(stream.next().await, Some(SessionEvent::ConnectionOpened));
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let bus = EventBus::new(0);
        let mut stream = bus.subscribe();
        bus.publish(SessionEvent::ConnectionOpened);
        assert_eq!(stream.next().await, Some(SessionEvent::ConnectionOpened));
    }
}
