//! Domain layer: session configuration and the observable vocabulary
//! (connection states, session events) shared by the engine and consumers.

pub mod config;
pub mod events;

pub use config::SessionConfig;
pub use events::{ConnectionState, SessionEvent};
