//! Domain value types: connection endpoints and screen-frame payloads.

pub mod endpoint;
pub mod frame;

pub use endpoint::{Endpoint, EndpointError};
pub use frame::{ImageFormat, ScreenFrame, ScreenFramePayload};
