//! Client error types
//!
//! Unified error handling for the chat client.

use chat_core::DomainError;
use std::fmt;

/// Client-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Validation errors
    #[error(transparent)]
    Validation(#[from] DomainError),

    // Session state errors
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected or connecting")]
    AlreadyConnected,

    // Transport errors
    #[error("Connection error: {0}")]
    Connection(String),

    // Malformed inbound data
    #[error("Protocol error: {0}")]
    Protocol(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl ClientError {
    /// Get error code for logs and status lines
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::NotConnected => "NOT_CONNECTED",
            Self::AlreadyConnected => "ALREADY_CONNECTED",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Protocol(_) => "PROTOCOL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error should be shown to the user as a blocking prompt
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotConnected | Self::AlreadyConnected
        )
    }

    /// Check if the session survives this error
    ///
    /// Connection errors tear the session down; the user has to reconnect.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Connection(_) | Self::Internal(_))
    }

    /// Create a connection error
    #[must_use]
    pub fn connection(msg: impl fmt::Display) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Create a protocol error
    #[must_use]
    pub fn protocol(msg: impl fmt::Display) -> Self {
        Self::Protocol(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<crate::config::ConfigError> for ClientError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
