//! Broker protocol definitions
//!
//! STOMP commands, the frame codec, and the channels and destinations the
//! chat server exposes.

mod channels;
mod commands;
mod frame;

pub use channels::{
    Channel, Destination, APP_PREFIX, PRIVATE_QUEUE, PUBLIC_TOPIC, TYPING_TOPIC, USER_COUNT_TOPIC,
};
pub use commands::StompCommand;
pub use frame::{FrameError, StompFrame, ACCEPT_VERSION};
