//! Chat session
//!
//! Connection lifecycle and the state machine that gates every send.

mod client;
mod state;

pub use client::{
    ChatClient, CONNECTION_FAILED_LABEL, CONNECTION_FAILED_MESSAGE, CONNECTION_LOST_MESSAGE,
    DISCONNECTED_MESSAGE,
};
pub use state::{Session, SessionStatus};
