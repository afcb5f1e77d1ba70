//! Envelope builders

mod envelope_builder;

pub use envelope_builder::EnvelopeBuilder;
