//! STOMP frame commands

use std::fmt;

/// STOMP 1.2 frame command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StompCommand {
    Connect,
    Stomp,
    Send,
    Subscribe,
    Unsubscribe,
    Disconnect,
    Connected,
    Message,
    Receipt,
    Error,
}

impl StompCommand {
    /// Parse a command line
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CONNECT" => Some(Self::Connect),
            "STOMP" => Some(Self::Stomp),
            "SEND" => Some(Self::Send),
            "SUBSCRIBE" => Some(Self::Subscribe),
            "UNSUBSCRIBE" => Some(Self::Unsubscribe),
            "DISCONNECT" => Some(Self::Disconnect),
            "CONNECTED" => Some(Self::Connected),
            "MESSAGE" => Some(Self::Message),
            "RECEIPT" => Some(Self::Receipt),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Get the wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Stomp => "STOMP",
            Self::Send => "SEND",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Disconnect => "DISCONNECT",
            Self::Connected => "CONNECTED",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
        }
    }

    /// Check if this command can be sent by the client
    #[must_use]
    pub const fn is_client_command(self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::Stomp
                | Self::Send
                | Self::Subscribe
                | Self::Unsubscribe
                | Self::Disconnect
        )
    }

    /// Check if this command can be sent by the broker
    #[must_use]
    pub const fn is_server_command(self) -> bool {
        matches!(
            self,
            Self::Connected | Self::Message | Self::Receipt | Self::Error
        )
    }

    /// CONNECT and CONNECTED headers are exempt from escaping
    #[must_use]
    pub const fn escapes_headers(self) -> bool {
        !matches!(self, Self::Connect | Self::Connected)
    }
}

impl fmt::Display for StompCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
