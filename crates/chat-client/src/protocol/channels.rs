//! Broker channel and destination definitions.
//!
//! Defines the STOMP destinations the client subscribes to and sends to.

/// Public broadcast topic
pub const PUBLIC_TOPIC: &str = "/topic/public";
/// Per-user private queue (resolved by the broker to the session's user)
pub const PRIVATE_QUEUE: &str = "/user/queue/private";
/// Typing notices
pub const TYPING_TOPIC: &str = "/topic/typing";
/// Online user count updates
pub const USER_COUNT_TOPIC: &str = "/topic/usercount";

/// Application destination prefix
pub const APP_PREFIX: &str = "/app/";

/// Subscribed channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Messages for all connected sessions
    Public,
    /// Messages addressed only to this user
    PrivateQueue,
    /// Typing notices
    Typing,
    /// User count updates
    UserCount,
}

impl Channel {
    /// Every channel a session subscribes to, in subscription order
    pub const ALL: [Self; 4] = [Self::Public, Self::PrivateQueue, Self::Typing, Self::UserCount];

    /// Get the broker destination
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Public => PUBLIC_TOPIC,
            Self::PrivateQueue => PRIVATE_QUEUE,
            Self::Typing => TYPING_TOPIC,
            Self::UserCount => USER_COUNT_TOPIC,
        }
    }

    /// Parse a destination header back to a channel
    ///
    /// Brokers may rewrite the private queue to a session-specific name
    /// (`/user/<name>/queue/private`), so any `/user/` destination ending in
    /// the queue suffix counts.
    #[must_use]
    pub fn parse(destination: &str) -> Option<Self> {
        match destination {
            PUBLIC_TOPIC => Some(Self::Public),
            PRIVATE_QUEUE => Some(Self::PrivateQueue),
            TYPING_TOPIC => Some(Self::Typing),
            USER_COUNT_TOPIC => Some(Self::UserCount),
            other if other.starts_with("/user/") && other.ends_with("/queue/private") => {
                Some(Self::PrivateQueue)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outbound application destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    AddUser,
    SendMessage,
    SendPrivate,
    Typing,
}

impl Destination {
    /// Get the broker destination
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::AddUser => "/app/chat.addUser",
            Self::SendMessage => "/app/chat.sendMessage",
            Self::SendPrivate => "/app/chat.sendPrivate",
            Self::Typing => "/app/chat.typing",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
