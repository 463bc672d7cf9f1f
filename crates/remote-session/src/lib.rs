//! Remote control session engine.
//!
//! This crate owns everything between the protocol types in `remote-core`
//! and a consumer UI: one persistent WebSocket connection to the PC-side
//! server, the state machine around it, command dispatch with correlation
//! ids, and screen-frame delivery to subscribers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐   requests    ┌──────────────────────────┐
//! │ Session (handle)    │──────────────▶│ session actor task       │
//! │ CommandDispatcher   │               │  owns the WebSocket       │
//! └─────────────────────┘               │  decodes inbound frames   │
//!           ▲                           └────────────┬─────────────┘
//!           │ state snapshots (watch)                │ events
//!           └────────────────────────────────────────▼
//!                                          EventBus (broadcast)
//! ```
//!
//! A single actor task owns the socket, so there is never concurrent access
//! to the transport; handles talk to it over an mpsc request channel and
//! observe it through a `watch` state cell and a `broadcast` event bus.
//!
//! # Example
//!
//! ```rust,no_run
//! use remote_core::{Endpoint, SystemAction};
//! use remote_session::{CommandDispatcher, Session, SessionConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::spawn(SessionConfig::default());
//! session.connect("192.168.0.20:8080".parse::<Endpoint>()?).await?;
//!
//! let dispatcher = CommandDispatcher::new(session.clone());
//! let id = dispatcher.send_system(SystemAction::Lock).await?;
//! println!("sent lock command {id}");
//!
//! session.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::dispatcher::CommandDispatcher;
pub use domain::config::SessionConfig;
pub use domain::events::{ConnectionState, SessionEvent};
pub use infrastructure::event_bus::{EventBus, EventStream};
pub use infrastructure::reassembler::FrameReassembler;
pub use infrastructure::session::{Session, SessionError};
