//! Envelope message type
//!
//! The wire carries the type as an upper-case string. Values this client does
//! not know are kept verbatim so they can still be rendered.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Type tag carried by every chat envelope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// A user joined the chat
    Join,
    /// A user left the chat
    Leave,
    /// Public chat line
    Chat,
    /// Direct message between two users
    Private,
    /// Typing notice
    Typing,
    /// Server generated notice
    System,
    /// Any type string this client does not recognise
    Other(String),
}

impl MessageType {
    /// Parse a wire type string. Never fails: unknown strings become `Other`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "JOIN" => Self::Join,
            "LEAVE" => Self::Leave,
            "CHAT" => Self::Chat,
            "PRIVATE" => Self::Private,
            "TYPING" => Self::Typing,
            "SYSTEM" => Self::System,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Join => "JOIN",
            Self::Leave => "LEAVE",
            Self::Chat => "CHAT",
            Self::Private => "PRIVATE",
            Self::Typing => "TYPING",
            Self::System => "SYSTEM",
            Self::Other(value) => value,
        }
    }

    /// Check if this type changes the presence set
    #[must_use]
    pub fn is_presence(&self) -> bool {
        matches!(self, Self::Join | Self::Leave)
    }

    /// Check if this is a type the client knows how to handle
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Serialize for MessageType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
