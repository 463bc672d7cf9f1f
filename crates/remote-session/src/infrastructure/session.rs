//! The session actor and its handle.
//!
//! One tokio task owns the WebSocket for the whole lifetime of the session,
//! so the transport is never touched concurrently.  [`Session`] handles are
//! cheap clones that talk to the actor over an mpsc request channel, read
//! the current [`ConnectionState`] from a `watch` cell, and observe
//! [`SessionEvent`]s through the broadcast bus.
//!
//! The actor runs two nested loops: an outer loop that waits for a connect
//! request while disconnected, and an inner drive loop that multiplexes
//! handle requests against inbound WebSocket traffic while connected.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use remote_core::{decode_event, DecodeError, Endpoint, InboundMessage};

use crate::domain::config::SessionConfig;
use crate::domain::events::{ConnectionState, SessionEvent};
use crate::infrastructure::event_bus::{EventBus, EventStream};
use crate::infrastructure::reassembler::FrameReassembler;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Close code sent on a locally initiated disconnect.
const CLOSE_NORMAL: u16 = 1000;

/// Close reason sent on a locally initiated disconnect.  The PC-side server
/// logs this text, so it is part of the wire contract.
const USER_DISCONNECT_REASON: &str = "User disconnected";

/// Errors surfaced by session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The operation requires a live connection and there is none.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called while an attempt or a live connection exists.
    #[error("a connection is already active or being established")]
    AlreadyActive,

    /// The transport failed while carrying out the operation.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The session actor has terminated; the handle is permanently dead.
    #[error("session terminated")]
    Terminated,
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// A handle to a running session actor.
///
/// All methods are safe to call from any task.  Clones share the same
/// underlying session.
#[derive(Debug, Clone)]
pub struct Session {
    req_tx: mpsc::Sender<Request>,
    state_rx: watch::Receiver<ConnectionState>,
    bus: EventBus,
}

impl Session {
    /// Spawns a new session actor and returns its handle.
    ///
    /// The actor starts [`ConnectionState::Disconnected`] and lives until
    /// every handle has been dropped; if a connection is open at that
    /// point, it is closed politely first.
    pub fn spawn(config: SessionConfig) -> Self {
        let (req_tx, req_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let bus = EventBus::new(config.event_capacity);

        let actor = SessionActor {
            req_rx,
            state_tx,
            bus: bus.clone(),
            config,
            reassembler: FrameReassembler::new(),
        };
        tokio::spawn(actor.run());

        Self {
            req_tx,
            state_rx,
            bus,
        }
    }

    /// Starts a connection attempt to `endpoint`.
    ///
    /// Returns as soon as the attempt is underway; completion is reported
    /// through the event bus as [`SessionEvent::ConnectionOpened`] or
    /// [`SessionEvent::ConnectionFailed`].
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyActive`] if the session is not disconnected,
    /// [`SessionError::Terminated`] if the actor is gone.
    pub async fn connect(&self, endpoint: Endpoint) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.req_tx
            .send(Request::Connect {
                endpoint,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Terminated)?;
        reply_rx.await.map_err(|_| SessionError::Terminated)?
    }

    /// Closes the connection (or aborts an in-flight attempt).
    ///
    /// Idempotent: disconnecting while already disconnected is a no-op that
    /// returns `Ok` and publishes nothing.
    ///
    /// # Errors
    ///
    /// [`SessionError::Terminated`] if the actor is gone.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.req_tx
            .send(Request::Disconnect { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Terminated)?;
        reply_rx.await.map_err(|_| SessionError::Terminated)?
    }

    /// Transmits one already-encoded wire text over the connection.
    ///
    /// Most callers want [`CommandDispatcher`](crate::CommandDispatcher)
    /// instead, which encodes and stamps correlation ids.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] without a live connection,
    /// [`SessionError::Transport`] if the send fails (the session then
    /// tears down), [`SessionError::Terminated`] if the actor is gone.
    pub async fn transmit(&self, text: String) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.req_tx
            .send(Request::Transmit {
                text,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Terminated)?;
        reply_rx.await.map_err(|_| SessionError::Terminated)?
    }

    /// The current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Subscribes to session events, returning the state at subscription
    /// time together with a stream of everything published afterwards.
    pub fn subscribe(&self) -> (ConnectionState, EventStream) {
        // Subscribe first, then read state: a transition that lands in
        // between shows up on the stream, so the caller never misses one.
        let stream = self.bus.subscribe();
        (self.state(), stream)
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

enum Request {
    Connect {
        endpoint: Endpoint,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Disconnect {
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Transmit {
        text: String,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
}

/// Outcome of a connection attempt.
enum Established {
    /// Handshake completed; drive the connection.
    Open(Box<WsStream>),
    /// The attempt failed or was aborted; return to the idle loop.
    Aborted,
    /// Every handle was dropped mid-attempt; stop the actor.
    HandlesGone,
}

struct SessionActor {
    req_rx: mpsc::Receiver<Request>,
    state_tx: watch::Sender<ConnectionState>,
    bus: EventBus,
    config: SessionConfig,
    reassembler: FrameReassembler,
}

impl SessionActor {
    async fn run(mut self) {
        while let Some(request) = self.req_rx.recv().await {
            match request {
                Request::Connect { endpoint, reply } => {
                    let _ = reply.send(Ok(()));
                    match self.establish(&endpoint).await {
                        Established::Open(ws) => {
                            if !self.drive(*ws).await {
                                return;
                            }
                        }
                        Established::Aborted => {}
                        Established::HandlesGone => return,
                    }
                }
                // Already disconnected: nothing to close, nothing to publish.
                Request::Disconnect { reply } => {
                    let _ = reply.send(Ok(()));
                }
                Request::Transmit { reply, .. } => {
                    let _ = reply.send(Err(SessionError::NotConnected));
                }
            }
        }
        debug!("all session handles dropped, actor stopping");
    }

    /// Runs one connection attempt, bounded by the configured timeout.
    ///
    /// Keeps servicing handle requests while the handshake is pending so a
    /// disconnect can abort the attempt.
    async fn establish(&mut self, endpoint: &Endpoint) -> Established {
        self.set_state(ConnectionState::Connecting);
        let url = endpoint.ws_url();
        info!(%endpoint, "connecting");

        let attempt = timeout(self.config.connect_timeout, connect_async(url.as_str()));
        tokio::pin!(attempt);

        loop {
            tokio::select! {
                outcome = &mut attempt => {
                    return match outcome {
                        Ok(Ok((ws, _response))) => {
                            self.set_state(ConnectionState::Connected);
                            info!(%endpoint, "connected");
                            self.bus.publish(SessionEvent::ConnectionOpened);
                            Established::Open(Box::new(ws))
                        }
                        Ok(Err(error)) => {
                            warn!(%endpoint, %error, "connection failed");
                            self.fail(error.to_string());
                            Established::Aborted
                        }
                        Err(_elapsed) => {
                            let cause = format!(
                                "connection attempt timed out after {:?}",
                                self.config.connect_timeout
                            );
                            warn!(%endpoint, "{cause}");
                            self.fail(cause);
                            Established::Aborted
                        }
                    };
                }
                request = self.req_rx.recv() => match request {
                    None => {
                        self.set_state(ConnectionState::Disconnected);
                        return Established::HandlesGone;
                    }
                    Some(Request::Disconnect { reply }) => {
                        // Dropping the pending handshake aborts it; no
                        // ConnectionOpened may be published after this.
                        info!(%endpoint, "connection attempt aborted by disconnect");
                        self.set_state(ConnectionState::Disconnected);
                        self.bus.publish(SessionEvent::ConnectionClosed {
                            code: CLOSE_NORMAL,
                            reason: USER_DISCONNECT_REASON.to_string(),
                        });
                        let _ = reply.send(Ok(()));
                        return Established::Aborted;
                    }
                    Some(Request::Connect { reply, .. }) => {
                        let _ = reply.send(Err(SessionError::AlreadyActive));
                    }
                    Some(Request::Transmit { reply, .. }) => {
                        let _ = reply.send(Err(SessionError::NotConnected));
                    }
                }
            }
        }
    }

    /// Drives a live connection until it ends.
    ///
    /// Returns `false` when the actor should stop because every handle is
    /// gone.
    async fn drive(&mut self, mut ws: WsStream) -> bool {
        loop {
            tokio::select! {
                request = self.req_rx.recv() => match request {
                    None => {
                        // Last handle dropped with the socket open: close
                        // politely, then stop.
                        let _ = ws.close(Some(close_frame())).await;
                        self.set_state(ConnectionState::Disconnected);
                        return false;
                    }
                    Some(Request::Disconnect { reply }) => {
                        if let Err(error) = ws.close(Some(close_frame())).await {
                            debug!(%error, "close handshake did not complete");
                        }
                        info!("disconnected");
                        self.set_state(ConnectionState::Disconnected);
                        self.bus.publish(SessionEvent::ConnectionClosed {
                            code: CLOSE_NORMAL,
                            reason: USER_DISCONNECT_REASON.to_string(),
                        });
                        let _ = reply.send(Ok(()));
                        return true;
                    }
                    Some(Request::Connect { reply, .. }) => {
                        let _ = reply.send(Err(SessionError::AlreadyActive));
                    }
                    Some(Request::Transmit { text, reply }) => {
                        match ws.send(Message::Text(text)).await {
                            Ok(()) => {
                                let _ = reply.send(Ok(()));
                            }
                            Err(error) => {
                                warn!(%error, "send failed, tearing session down");
                                let cause = error.to_string();
                                self.fail(cause.clone());
                                let _ = reply.send(Err(SessionError::Transport(cause)));
                                return true;
                            }
                        }
                    }
                },
                inbound = ws.next() => match inbound {
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = match frame {
                            Some(frame) => (u16::from(frame.code), frame.reason.into_owned()),
                            None => (CLOSE_NORMAL, String::new()),
                        };
                        info!(code, %reason, "server closed the connection");
                        self.set_state(ConnectionState::Disconnected);
                        self.bus.publish(SessionEvent::ConnectionClosed { code, reason });
                        return true;
                    }
                    Some(Ok(message)) => self.handle_message(message),
                    Some(Err(error)) => {
                        warn!(%error, "transport error, tearing session down");
                        self.fail(error.to_string());
                        return true;
                    }
                    None => {
                        self.fail("connection closed unexpectedly".to_string());
                        return true;
                    }
                }
            }
        }
    }

    /// Handles one non-close inbound message.
    fn handle_message(&mut self, message: Message) {
        match message {
            Message::Text(text) => self.handle_inbound_text(&text),
            // Some handheld clients historically sent JSON in binary
            // frames; accept the symmetric case from the server.
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => self.handle_inbound_text(&text),
                Err(_) => debug!("ignoring non-UTF-8 binary frame"),
            },
            // tungstenite answers pings internally on the next read/write.
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) | Message::Frame(_) => {}
        }
    }

    fn handle_inbound_text(&mut self, text: &str) {
        match decode_event(text) {
            Ok(InboundMessage::ScreenFrame(payload)) => {
                if let Some(frame) = self.reassembler.accept(payload) {
                    self.bus.publish(SessionEvent::ScreenFrame(frame));
                }
            }
            Ok(InboundMessage::Unrecognized(raw)) => {
                debug!(
                    message_type = ?raw.get("type"),
                    action = ?raw.get("action"),
                    "ignoring unrecognized message"
                );
            }
            // Undecodable traffic is dropped, never session-fatal.  The
            // server's `welcome` greeting lands here (no action field).
            Err(error @ DecodeError::MissingField(_)) => {
                debug!(%error, "dropping inbound message");
            }
            Err(error) => {
                debug!(%error, "dropping undecodable inbound message");
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }

    /// Marks the session disconnected and publishes a failure event.
    fn fail(&self, cause: String) {
        self.set_state(ConnectionState::Disconnected);
        self.bus.publish(SessionEvent::ConnectionFailed { cause });
    }
}

fn close_frame() -> CloseFrame<'static> {
    CloseFrame {
        code: CloseCode::Normal,
        reason: USER_DISCONNECT_REASON.into(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
