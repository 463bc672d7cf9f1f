//! # remote-core
//!
//! Shared library for the PC Remote session engine containing the JSON wire
//! protocol, command model, and domain entities.
//!
//! This crate is used by the session engine (`remote-session`) and by any
//! tooling that needs to speak the protocol without a live connection.  It
//! has zero dependencies on the async runtime, UI frameworks, or network
//! sockets.
//!
//! # Protocol overview
//!
//! PC Remote lets a handheld client drive a desktop machine over a single
//! persistent WebSocket connection.  Every outbound message is one JSON
//! object:
//!
//! ```json
//! {"type":"system","action":"shutdown","id":1712345678901}
//! {"type":"input","action":"mouse_move","id":1712345678902,"deltaX":5,"deltaY":-3}
//! ```
//!
//! The only documented inbound message is a mirrored screen frame:
//!
//! ```json
//! {"type":"screen","action":"frame","data":"<base64 image bytes>"}
//! ```
//!
//! This crate defines:
//!
//! - **`protocol`** – The command model (families, per-family action sets,
//!   correlation ids) and the codec that turns commands into wire text and
//!   wire text into typed inbound messages.
//!
//! - **`domain`** – Pure value types with no protocol knowledge: the
//!   `host:port` endpoint a session is built from, and screen-frame payloads
//!   with image-format detection.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `remote_core::Command` instead of `remote_core::protocol::commands::Command`.
pub use domain::endpoint::{Endpoint, EndpointError};
pub use domain::frame::{ImageFormat, ScreenFrame, ScreenFramePayload};
pub use protocol::codec::{decode_event, encode_command, DecodeError, InboundMessage};
pub use protocol::commands::{
    Command, CommandFamily, FileAction, InputAction, MediaAction, MouseButton, ScreenAction,
    SystemAction, UnknownAction,
};
pub use protocol::correlation::CommandIdSource;
