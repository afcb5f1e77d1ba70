//! Outbound envelope construction
//!
//! Pure functions: each either returns a well-formed envelope or a
//! [`DomainError`]. Whether the session may actually send is the caller's
//! concern.

use crate::entities::ChatEnvelope;
use crate::error::DomainError;
use crate::value_objects::MessageType;

/// Builds outbound envelopes
pub struct EnvelopeBuilder;

impl EnvelopeBuilder {
    /// JOIN announcement sent right after subscribing
    pub fn build_join(username: &str) -> ChatEnvelope {
        ChatEnvelope::new(
            username,
            format!("{username} joined the chat!"),
            MessageType::Join,
        )
    }

    /// Public chat line
    pub fn build_chat(username: &str, content: &str) -> Result<ChatEnvelope, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent);
        }

        Ok(ChatEnvelope::new(username, content, MessageType::Chat))
    }

    /// Private message
    ///
    /// The returned envelope's `sender` is the recipient; the broker resolves
    /// the author from the session.
    pub fn build_private(
        recipient: &str,
        content: &str,
        sender_username: &str,
    ) -> Result<ChatEnvelope, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent);
        }

        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(DomainError::MissingRecipient);
        }

        if recipient == sender_username {
            return Err(DomainError::SelfTarget);
        }

        Ok(ChatEnvelope::new(recipient, content, MessageType::Private))
    }

    /// Typing notice
    pub fn build_typing(username: &str) -> ChatEnvelope {
        ChatEnvelope::new(username, "", MessageType::Typing)
    }

    /// Copy of a sent private message, shown in the author's own history
    pub fn local_private_echo(username: &str, recipient: &str, content: &str) -> ChatEnvelope {
        ChatEnvelope::new(
            username,
            format!("To {}: {}", recipient.trim(), content.trim()),
            MessageType::Private,
        )
        .stamped_now()
    }
}
