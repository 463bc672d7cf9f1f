//! JSON codec for the PC Remote wire protocol.
//!
//! Wire format: every message is one UTF-8 text frame containing one JSON
//! object.  Outbound commands carry `type`, `action`, and `id` at the top
//! level with action-specific fields merged beside them:
//!
//! ```json
//! {"type":"input","action":"mouse_move","id":1712345678902,"deltaX":5,"deltaY":-3}
//! ```
//!
//! Inbound, the only documented message is the mirrored screen frame
//! (`type=screen, action=frame` with a base64 `data` field).  Everything
//! else the server may send is decoded as [`InboundMessage::Unrecognized`]
//! and ignored upstream — the engine stays forward compatible with server
//! additions instead of failing the session.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::frame::ScreenFramePayload;
use crate::protocol::commands::Command;

/// Errors that can occur while decoding an inbound message.
///
/// None of these are session-fatal: the receive loop logs the error, drops
/// the message, and keeps reading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The text is not a JSON object at all.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// A required field is absent or has the wrong JSON type.
    #[error("missing or invalid field `{0}`")]
    MissingField(&'static str),

    /// A `screen`/`frame` message whose `data` field is not valid base64.
    #[error("invalid screen frame payload: {0}")]
    InvalidFramePayload(String),
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// A screen frame: the base64 `data` field decoded to raw image bytes.
    /// Validation of the image itself happens in the frame reassembler.
    ScreenFrame(ScreenFramePayload),

    /// Any well-formed message outside the documented inbound set.  Carries
    /// the raw JSON value for diagnostics.
    Unrecognized(Value),
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes a [`Command`] into its wire text.
///
/// Never fails for commands built through the constructors in
/// [`commands`](crate::protocol::commands): serialization of a JSON object
/// built from plain strings and integers cannot error.  Payload entries that
/// would shadow the reserved `type`/`action`/`id` keys are skipped.
pub fn encode_command(command: &Command) -> String {
    let mut object = Map::with_capacity(command.payload.len() + 3);
    object.insert("type".to_string(), Value::from(command.family.as_str()));
    object.insert("action".to_string(), Value::from(command.action.as_str()));
    object.insert("id".to_string(), Value::from(command.id));

    for (key, value) in &command.payload {
        if matches!(key.as_str(), "type" | "action" | "id") {
            continue;
        }
        object.insert(key.clone(), value.clone());
    }

    Value::Object(object).to_string()
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes one inbound wire text into an [`InboundMessage`].
///
/// Decoding policy:
///
/// - not valid JSON, or valid JSON that is not an object →
///   [`DecodeError::Malformed`]
/// - missing or non-string `type` or `action` →
///   [`DecodeError::MissingField`]
/// - `type == "screen" && action == "frame"`: the `data` field is required
///   and base64-decoded; a bad payload is
///   [`DecodeError::InvalidFramePayload`]
/// - any other `type`/`action` pair → [`InboundMessage::Unrecognized`]
///
/// # Errors
///
/// Returns [`DecodeError`] per the policy above.  Callers drop the message
/// and keep the session open.
pub fn decode_event(text: &str) -> Result<InboundMessage, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::Malformed("expected a JSON object".to_string()))?;

    let message_type = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingField("type"))?;
    let action = object
        .get("action")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingField("action"))?;

    if message_type == "screen" && action == "frame" {
        let data = object
            .get("data")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingField("data"))?;
        let bytes = BASE64
            .decode(data)
            .map_err(|e| DecodeError::InvalidFramePayload(e.to_string()))?;
        return Ok(InboundMessage::ScreenFrame(ScreenFramePayload { bytes }));
    }

    Ok(InboundMessage::Unrecognized(value))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
