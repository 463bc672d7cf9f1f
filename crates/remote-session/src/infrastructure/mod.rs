//! Infrastructure layer: the event bus, the frame reassembler, and the
//! session actor that owns the WebSocket transport.

pub mod event_bus;
pub mod reassembler;
pub mod session;

pub use event_bus::{EventBus, EventStream};
pub use reassembler::FrameReassembler;
pub use session::{Session, SessionError};
