//! Broker transport
//!
//! The session talks to the broker through [`Transport`]. Calls never block:
//! `connect` returns the id of the new attempt immediately and the outcome
//! arrives later as a [`TransportEvent`] tagged with that id.

mod stomp;

pub use stomp::StompTransport;

use crate::protocol::{Channel, Destination, FrameError};
use chat_common::BrokerConfig;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Identity of one transport connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// STOMP subscription id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    #[must_use]
    pub fn from_index(index: u64) -> Self {
        Self(format!("sub-{index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where and how to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub url: String,
    /// STOMP `host` header
    pub host: String,
    pub connect_timeout: Duration,
}

impl ConnectOptions {
    #[must_use]
    pub fn from_config(config: &BrokerConfig) -> Self {
        Self {
            url: config.url.clone(),
            host: config.host.clone(),
            connect_timeout: config.connect_timeout(),
        }
    }
}

/// Something the transport observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake finished; subscriptions and sends are now possible
    Connected { connection: ConnectionId },
    /// Handshake did not finish
    ConnectFailed {
        connection: ConnectionId,
        reason: String,
    },
    /// A message arrived on a subscribed channel
    Message {
        connection: ConnectionId,
        channel: Channel,
        body: String,
    },
    /// An established connection went away without being asked to
    Closed {
        connection: ConnectionId,
        reason: String,
    },
}

impl TransportEvent {
    /// The connection attempt this event belongs to
    #[must_use]
    pub fn connection(&self) -> ConnectionId {
        match self {
            Self::Connected { connection }
            | Self::ConnectFailed { connection, .. }
            | Self::Message { connection, .. }
            | Self::Closed { connection, .. } => *connection,
        }
    }
}

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,

    #[error("connection task has stopped")]
    ChannelClosed,

    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("broker rejected the connection: {0}")]
    Rejected(String),

    #[error("timed out waiting for the broker")]
    Timeout,
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(err.to_string())
    }
}

/// Publish/subscribe broker client
pub trait Transport {
    /// Start a connection attempt, replacing any current connection
    fn connect(&mut self, options: &ConnectOptions) -> ConnectionId;

    /// Subscribe the current connection to a channel
    fn subscribe(&mut self, channel: Channel) -> Result<SubscriptionId, TransportError>;

    /// Send a serialized body to a destination
    fn send(&mut self, destination: Destination, body: String) -> Result<(), TransportError>;

    /// Tear down the current connection. Safe to call when not connected.
    fn disconnect(&mut self);
}
