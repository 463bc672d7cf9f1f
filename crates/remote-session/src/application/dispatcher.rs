//! Typed command dispatch over a session.
//!
//! The dispatcher is the API consumers actually call: one method per
//! command family, each stamping a fresh correlation id, encoding the wire
//! text, and handing it to the session for transmission.

use tracing::debug;

use remote_core::{
    encode_command, Command, CommandIdSource, FileAction, InputAction, MediaAction, ScreenAction,
    SystemAction,
};

use crate::infrastructure::session::{Session, SessionError};

/// Sends typed commands over a [`Session`], stamping each with a unique
/// correlation id.
///
/// Every `send_*` method returns the id it stamped, so a caller can tie a
/// later acknowledgement (or a log line on the PC side) back to the exact
/// command.
#[derive(Debug)]
pub struct CommandDispatcher {
    session: Session,
    ids: CommandIdSource,
}

impl CommandDispatcher {
    /// Creates a dispatcher with clock-seeded correlation ids.
    pub fn new(session: Session) -> Self {
        Self::with_ids(session, CommandIdSource::new())
    }

    /// Creates a dispatcher with an explicit id source, for reproducible
    /// ids.
    pub fn with_ids(session: Session, ids: CommandIdSource) -> Self {
        Self { session, ids }
    }

    /// Sends a media playback command.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the transmission.
    pub async fn send_media(&self, action: MediaAction) -> Result<u64, SessionError> {
        self.dispatch(Command::media(action, self.ids.next())).await
    }

    /// Sends a pointer command (relative move or click).
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the transmission.
    pub async fn send_input(&self, action: InputAction) -> Result<u64, SessionError> {
        self.dispatch(Command::input(action, self.ids.next())).await
    }

    /// Sends a system power/lock command.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the transmission.
    pub async fn send_system(&self, action: SystemAction) -> Result<u64, SessionError> {
        self.dispatch(Command::system(action, self.ids.next()))
            .await
    }

    /// Sends a file transfer command.  The file contents are base64-encoded
    /// into the wire text, so large files produce large frames.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the transmission.
    pub async fn send_file(&self, action: &FileAction) -> Result<u64, SessionError> {
        self.dispatch(Command::file(action, self.ids.next())).await
    }

    /// Sends a screen mirroring control command (start or stop).
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the transmission.
    pub async fn send_screen(&self, action: ScreenAction) -> Result<u64, SessionError> {
        self.dispatch(Command::screen(action, self.ids.next()))
            .await
    }

    async fn dispatch(&self, command: Command) -> Result<u64, SessionError> {
        let id = command.id;
        debug!(
            family = %command.family,
            action = %command.action,
            id,
            "dispatching command"
        );
        self.session.transmit(encode_command(&command)).await?;
        Ok(id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
