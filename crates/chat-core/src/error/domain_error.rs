//! Domain errors - validation failures raised before anything reaches the wire

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Please enter your name")]
    InvalidUsername,

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Please select a recipient for private messages")]
    MissingRecipient,

    #[error("You cannot send a private message to yourself")]
    SelfTarget,
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::MissingRecipient => "MISSING_RECIPIENT",
            Self::SelfTarget => "SELF_TARGET",
        }
    }

    /// Check if this is a validation error
    ///
    /// Every domain error is currently a validation error; callers should still
    /// ask rather than assume.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidUsername | Self::EmptyContent | Self::MissingRecipient | Self::SelfTarget
        )
    }

    /// Check if this error concerns the private message recipient
    pub fn is_recipient_error(&self) -> bool {
        matches!(self, Self::MissingRecipient | Self::SelfTarget)
    }
}
