//! Protocol module containing the command model, correlation ids, and the
//! JSON wire codec.

pub mod codec;
pub mod commands;
pub mod correlation;

pub use codec::{decode_event, encode_command, DecodeError, InboundMessage};
pub use commands::*;
pub use correlation::CommandIdSource;
