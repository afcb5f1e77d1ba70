//! Session state
//!
//! Tracks connection status and the identity of the local user.

use crate::transport::ConnectionId;
use std::fmt;
use uuid::Uuid;

/// Connection status of the chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl SessionStatus {
    /// Default human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One chat session
///
/// Created on a connect attempt and reset on disconnect or connection loss.
/// Sends are only allowed while connected with a non-empty username.
#[derive(Debug, Clone, Default)]
pub struct Session {
    status: SessionStatus,
    username: Option<String>,
    connection: Option<ConnectionId>,
    session_id: Option<Uuid>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a connect attempt
    pub fn begin(&mut self, username: impl Into<String>, connection: ConnectionId) {
        self.status = SessionStatus::Connecting;
        self.username = Some(username.into());
        self.connection = Some(connection);
        self.session_id = Some(Uuid::new_v4());
    }

    pub fn mark_connected(&mut self) {
        self.status = SessionStatus::Connected;
    }

    /// Forget everything about the session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    /// Identifier used to correlate log lines
    #[must_use]
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == SessionStatus::Connected
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != SessionStatus::Disconnected
    }

    /// Check if outbound sends and subscriptions are permitted
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.is_connected() && self.username.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Check if a transport event belongs to the current attempt
    #[must_use]
    pub fn is_current(&self, connection: ConnectionId) -> bool {
        self.connection == Some(connection)
    }
}
