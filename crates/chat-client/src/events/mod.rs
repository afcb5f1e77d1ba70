//! Client events
//!
//! Everything that can happen to a chat session arrives as a [`ClientEvent`]
//! on one channel and is handled to completion before the next one.

use crate::timer::TimerFired;
use crate::transport::TransportEvent;
use chat_core::MessageMode;
use tokio::sync::mpsc;

/// Sending half of the event loop channel
pub type EventSender = mpsc::UnboundedSender<ClientEvent>;
/// Receiving half of the event loop channel
pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;

/// Create the event loop channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Input produced by the user interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ConnectRequested(String),
    DisconnectRequested,
    /// Send with an explicit mode and recipient
    SendRequested {
        content: String,
        mode: MessageMode,
        recipient: Option<String>,
    },
    /// Send using the currently selected mode and recipient
    Submit(String),
    Keystroke,
    InputCleared,
    ModeChanged(MessageMode),
    /// Pick a user from the presence list as private recipient
    SelectUser(String),
}

/// Event loop input
#[derive(Debug)]
pub enum ClientEvent {
    Ui(UiEvent),
    Transport(TransportEvent),
    Timer(TimerFired),
    Shutdown,
}

impl From<UiEvent> for ClientEvent {
    fn from(event: UiEvent) -> Self {
        Self::Ui(event)
    }
}

impl From<TransportEvent> for ClientEvent {
    fn from(event: TransportEvent) -> Self {
        Self::Transport(event)
    }
}

impl From<TimerFired> for ClientEvent {
    fn from(fired: TimerFired) -> Self {
        Self::Timer(fired)
    }
}
