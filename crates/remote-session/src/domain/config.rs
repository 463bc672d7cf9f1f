//! Session engine configuration.

use std::time::Duration;

/// Tunables for a [`Session`](crate::Session).
///
/// The defaults match the behavior of the handheld apps: a connection
/// attempt that has not completed the WebSocket handshake within five
/// seconds is reported as failed, and slow event subscribers may be skipped
/// past once the bus backlog exceeds 64 events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on one connection attempt: TCP connect plus WebSocket
    /// handshake.
    pub connect_timeout: Duration,

    /// Broadcast capacity of the event bus.  A subscriber that falls more
    /// than this many events behind loses the oldest ones (screen frames
    /// dominate the event stream, and stale frames are worthless).
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            event_capacity: 64,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
