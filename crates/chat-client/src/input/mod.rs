//! Terminal input parsing
//!
//! Turns one line typed at the prompt into a client event. Lines starting
//! with `/` are commands; anything else is a message in the current mode.

use crate::events::{ClientEvent, UiEvent};
use chat_core::MessageMode;

/// Command summary printed for `/help`
pub const HELP: &str = "\
Commands:
  /connect <name>       join the chat as <name>
  /disconnect           leave the chat
  /public               send public messages
  /private <user>       send private messages to <user>
  /msg <user> <text>    send one private message
  /quit                 exit
Anything else is sent as a message.";

/// Result of parsing one input line
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    Event(UiEvent),
    Quit,
    Help,
    /// Nothing to do (blank line)
    Nothing,
    Invalid(String),
}

impl InputAction {
    /// Event to post on the loop, if any
    pub fn into_event(self) -> Option<ClientEvent> {
        match self {
            Self::Event(event) => Some(ClientEvent::Ui(event)),
            Self::Quit => Some(ClientEvent::Shutdown),
            Self::Help | Self::Nothing | Self::Invalid(_) => None,
        }
    }
}

/// Parse one line of input
#[must_use]
pub fn parse_line(line: &str) -> InputAction {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(command) = line.strip_prefix('/') else {
        if line.trim().is_empty() {
            return InputAction::Nothing;
        }
        return InputAction::Event(UiEvent::Submit(line.to_string()));
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));

    match name {
        "connect" | "join" => {
            if rest.is_empty() {
                InputAction::Invalid("usage: /connect <name>".to_string())
            } else {
                InputAction::Event(UiEvent::ConnectRequested(rest.to_string()))
            }
        }
        "disconnect" | "leave" => InputAction::Event(UiEvent::DisconnectRequested),
        "public" => InputAction::Event(UiEvent::ModeChanged(MessageMode::Public)),
        "private" => {
            if rest.is_empty() {
                InputAction::Event(UiEvent::ModeChanged(MessageMode::Private))
            } else {
                InputAction::Event(UiEvent::SelectUser(rest.to_string()))
            }
        }
        "msg" => match rest.split_once(char::is_whitespace) {
            Some((user, text)) => InputAction::Event(UiEvent::SendRequested {
                content: text.trim().to_string(),
                mode: MessageMode::Private,
                recipient: Some(user.to_string()),
            }),
            None => InputAction::Invalid("usage: /msg <user> <text>".to_string()),
        },
        "quit" | "exit" => InputAction::Quit,
        "help" | "?" => InputAction::Help,
        other => InputAction::Invalid(format!("unknown command: /{other}")),
    }
}
