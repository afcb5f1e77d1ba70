//! Value objects - immutable types that represent domain concepts

mod message_mode;
mod message_type;

pub use message_mode::MessageMode;
pub use message_type::MessageType;
