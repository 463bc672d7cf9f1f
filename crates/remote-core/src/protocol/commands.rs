//! The outbound command model: families, per-family action sets, and the
//! [`Command`] value the codec serializes.
//!
//! Every remote action the handheld can trigger is one of five families
//! (`media`, `input`, `system`, `file`, `screen`), each with a closed set of
//! action tokens.  The enums below carry the exact wire spellings, so a
//! command that constructs at all is a command the server understands —
//! invalid tokens are rejected at parse time, before anything touches the
//! session.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Value};
use thiserror::Error;

/// A token that is not part of the expected set.
///
/// `kind` names the token set that was consulted (e.g. `"media action"`),
/// `token` is the rejected input.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} token '{token}'")]
pub struct UnknownAction {
    pub kind: &'static str,
    pub token: String,
}

impl UnknownAction {
    fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_string(),
        }
    }
}

// ── Command families ──────────────────────────────────────────────────────────

/// The five command families of the wire protocol (`type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandFamily {
    Media,
    Input,
    System,
    File,
    Screen,
}

impl CommandFamily {
    /// The wire token carried in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandFamily::Media => "media",
            CommandFamily::Input => "input",
            CommandFamily::System => "system",
            CommandFamily::File => "file",
            CommandFamily::Screen => "screen",
        }
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandFamily {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "media" => Ok(CommandFamily::Media),
            "input" => Ok(CommandFamily::Input),
            "system" => Ok(CommandFamily::System),
            "file" => Ok(CommandFamily::File),
            "screen" => Ok(CommandFamily::Screen),
            other => Err(UnknownAction::new("command family", other)),
        }
    }
}

// ── Media ─────────────────────────────────────────────────────────────────────

/// Media playback actions.  No payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    Previous,
    Next,
    PlayPause,
    Mute,
}

impl MediaAction {
    /// The wire token carried in the `action` field.
    pub fn token(&self) -> &'static str {
        match self {
            MediaAction::Previous => "previous",
            MediaAction::Next => "next",
            MediaAction::PlayPause => "play_pause",
            MediaAction::Mute => "mute",
        }
    }
}

impl FromStr for MediaAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "previous" => Ok(MediaAction::Previous),
            "next" => Ok(MediaAction::Next),
            "play_pause" => Ok(MediaAction::PlayPause),
            "mute" => Ok(MediaAction::Mute),
            other => Err(UnknownAction::new("media action", other)),
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Mouse buttons the server can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub fn token(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
        }
    }
}

impl FromStr for MouseButton {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            other => Err(UnknownAction::new("mouse button", other)),
        }
    }
}

/// Pointer input actions.  Payload fields are action-specific and merge into
/// the top level of the wire object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Relative cursor movement (`deltaX`/`deltaY` wire fields).
    MouseMove { delta_x: i32, delta_y: i32 },
    /// Button click (`button` wire field, `left` or `right`).
    MouseClick { button: MouseButton },
}

impl InputAction {
    pub fn token(&self) -> &'static str {
        match self {
            InputAction::MouseMove { .. } => "mouse_move",
            InputAction::MouseClick { .. } => "mouse_click",
        }
    }

    /// Action-specific fields for the top level of the wire object.
    ///
    /// Key spellings (`deltaX`, `deltaY`, `button`) are fixed by the server.
    fn payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            InputAction::MouseMove { delta_x, delta_y } => {
                map.insert("deltaX".to_string(), Value::from(*delta_x));
                map.insert("deltaY".to_string(), Value::from(*delta_y));
            }
            InputAction::MouseClick { button } => {
                map.insert("button".to_string(), Value::from(button.token()));
            }
        }
        map
    }
}

// ── System ────────────────────────────────────────────────────────────────────

/// Power and session actions on the remote machine.  No payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    Lock,
    Sleep,
    Restart,
    Shutdown,
}

impl SystemAction {
    pub fn token(&self) -> &'static str {
        match self {
            SystemAction::Lock => "lock",
            SystemAction::Sleep => "sleep",
            SystemAction::Restart => "restart",
            SystemAction::Shutdown => "shutdown",
        }
    }
}

impl FromStr for SystemAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lock" => Ok(SystemAction::Lock),
            "sleep" => Ok(SystemAction::Sleep),
            "restart" => Ok(SystemAction::Restart),
            "shutdown" => Ok(SystemAction::Shutdown),
            other => Err(UnknownAction::new("system action", other)),
        }
    }
}

// ── File ──────────────────────────────────────────────────────────────────────

/// File-transfer actions.
///
/// The whole file travels in one message: the server receives `filename`
/// plus the standard-base64 `data` field and writes it to its download
/// directory.  There is no chunking in this protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    Receive {
        filename: String,
        contents: Vec<u8>,
    },
}

impl FileAction {
    pub fn token(&self) -> &'static str {
        match self {
            FileAction::Receive { .. } => "receive",
        }
    }

    fn payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            FileAction::Receive { filename, contents } => {
                map.insert("filename".to_string(), Value::from(filename.as_str()));
                map.insert("data".to_string(), Value::from(BASE64.encode(contents)));
            }
        }
        map
    }
}

// ── Screen ────────────────────────────────────────────────────────────────────

/// Screen-mirroring control actions.  No payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    Start,
    Stop,
}

impl ScreenAction {
    pub fn token(&self) -> &'static str {
        match self {
            ScreenAction::Start => "start",
            ScreenAction::Stop => "stop",
        }
    }
}

impl FromStr for ScreenAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ScreenAction::Start),
            "stop" => Ok(ScreenAction::Stop),
            other => Err(UnknownAction::new("screen action", other)),
        }
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// One fully built outbound command, ready for the codec.
///
/// `id` is the correlation id: strictly increasing, unique for the lifetime
/// of the process (see
/// [`CommandIdSource`](crate::protocol::correlation::CommandIdSource)).
/// `payload` holds the action-specific fields that merge into the top level
/// of the wire object beside `type`, `action`, and `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub family: CommandFamily,
    pub action: String,
    pub id: u64,
    pub payload: Map<String, Value>,
}

impl Command {
    fn new(family: CommandFamily, action: &str, id: u64, payload: Map<String, Value>) -> Self {
        Self {
            family,
            action: action.to_string(),
            id,
            payload,
        }
    }

    pub fn media(action: MediaAction, id: u64) -> Command {
        Command::new(CommandFamily::Media, action.token(), id, Map::new())
    }

    pub fn input(action: InputAction, id: u64) -> Command {
        Command::new(CommandFamily::Input, action.token(), id, action.payload())
    }

    pub fn system(action: SystemAction, id: u64) -> Command {
        Command::new(CommandFamily::System, action.token(), id, Map::new())
    }

    pub fn file(action: &FileAction, id: u64) -> Command {
        Command::new(CommandFamily::File, action.token(), id, action.payload())
    }

    pub fn screen(action: ScreenAction, id: u64) -> Command {
        Command::new(CommandFamily::Screen, action.token(), id, Map::new())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
