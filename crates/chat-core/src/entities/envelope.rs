//! Chat envelope - the single message shape exchanged over every channel

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::MessageType;

/// Timestamp layout used by the broker
pub const SERVER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Chat envelope
///
/// For an outgoing `PRIVATE` envelope, `sender` carries the recipient rather
/// than the author. The broker reads it as the delivery target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEnvelope {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatEnvelope {
    /// Create a new envelope without a timestamp
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        message_type: MessageType,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            message_type,
            timestamp: None,
        }
    }

    /// Attach a timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Stamp with the current time in RFC 3339
    #[must_use]
    pub fn stamped_now(self) -> Self {
        self.with_timestamp(Utc::now().to_rfc3339())
    }

    /// Decode an envelope from a JSON body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Encode this envelope as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse the timestamp, accepting both the broker format and RFC 3339
    ///
    /// Broker timestamps carry no zone and are read as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        NaiveDateTime::parse_from_str(raw, SERVER_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.message_type == MessageType::Private
    }

    /// Check if the content is blank
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
