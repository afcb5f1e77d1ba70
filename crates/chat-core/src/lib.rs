//! # chat-core
//!
//! Domain layer for the chat client: the wire envelope, message types, the
//! presence set and outbound envelope construction.
//! This crate has zero dependencies on infrastructure (transport, runtime, UI).

pub mod builders;
pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use builders::EnvelopeBuilder;
pub use entities::{ChatEnvelope, PresenceSet, SERVER_TIMESTAMP_FORMAT};
pub use error::DomainError;
pub use value_objects::{MessageMode, MessageType};
