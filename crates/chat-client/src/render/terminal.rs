//! Line-oriented terminal output

use super::Renderer;
use crate::session::SessionStatus;
use chat_core::{ChatEnvelope, PresenceSet};
use std::io::{self, Stdout, Write};

/// Writes one line per rendering call
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_message(&mut self, envelope: &ChatEnvelope, is_private: bool) {
        let time = envelope
            .parsed_timestamp()
            .map_or_else(chrono::Local::now, |ts| ts.with_timezone(&chrono::Local))
            .format("%H:%M:%S");
        let private = if is_private { " (Private)" } else { "" };
        self.line(&format!(
            "[{time}] {} • {}{private}: {}",
            envelope.message_type, envelope.sender, envelope.content
        ));
    }

    fn render_presence_list(&mut self, users: &PresenceSet, local_username: Option<&str>) {
        let mut names: Vec<String> = Vec::with_capacity(users.len() + 1);
        match local_username {
            Some(local) => {
                names.push(format!("{local} (you)"));
                names.extend(users.others(local).map(str::to_string));
            }
            None => names.extend(users.iter().map(str::to_string)),
        }

        if names.is_empty() {
            self.line("Online: nobody");
        } else {
            self.line(&format!("Online: {}", names.join(", ")));
        }
    }

    fn render_connection_status(&mut self, status: SessionStatus, label: &str) {
        self.line(&format!("[{status}] {label}"));
    }

    fn render_typing_indicator(&mut self, text: Option<&str>) {
        if let Some(text) = text {
            self.line(&format!("  ... {text}"));
        }
    }

    fn render_system_message(&mut self, text: &str) {
        self.line(&format!("*** {text}"));
    }

    fn render_user_count(&mut self, text: &str) {
        self.line(&format!("Users online: {text}"));
    }

    fn render_alert(&mut self, text: &str) {
        self.line(&format!("!!! {text}"));
    }
}
