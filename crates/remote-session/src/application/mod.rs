//! Application layer: the typed command dispatcher consumers use to drive
//! the PC.

pub mod dispatcher;

pub use dispatcher::CommandDispatcher;
