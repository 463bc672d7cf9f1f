//! Connection states and session events.
//!
//! These are the engine's observable surface: consumers poll
//! [`ConnectionState`] through the session handle and receive
//! [`SessionEvent`]s through the event bus.  Neither type references the
//! transport, so a UI layer depends only on this vocabulary.

use std::fmt;
use std::sync::Arc;

use remote_core::ScreenFrame;

/// Where the session currently is in its lifecycle.
///
/// Transitions:
///
/// ```text
/// Disconnected ──connect()──▶ Connecting ──handshake ok──▶ Connected
///      ▲                          │                            │
///      └──────failure/abort───────┴────close/failure───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection and no attempt in flight.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The WebSocket is open and commands can be transmitted.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        write!(f, "{label}")
    }
}

/// An event published on the session event bus.
///
/// Screen frames are shared via [`Arc`] so fan-out to multiple subscribers
/// never copies image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The WebSocket handshake completed; the session is [`ConnectionState::Connected`].
    ConnectionOpened,

    /// The connection ended in an orderly way: either the local side closed
    /// it or the server sent a close frame.
    ConnectionClosed {
        /// WebSocket close code (1000 for a normal local close).
        code: u16,
        /// Close reason text, possibly empty.
        reason: String,
    },

    /// A connection attempt failed, or a live connection was torn down by a
    /// transport error.
    ConnectionFailed {
        /// Human-readable cause, suitable for display.
        cause: String,
    },

    /// A validated screen frame arrived from the mirroring stream.
    ScreenFrame(Arc<ScreenFrame>),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
