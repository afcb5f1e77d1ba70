//! Domain entities - core chat objects

mod envelope;
mod presence;

pub use envelope::{ChatEnvelope, SERVER_TIMESTAMP_FORMAT};
pub use presence::PresenceSet;
