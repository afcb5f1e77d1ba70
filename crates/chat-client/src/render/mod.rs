//! User interface output
//!
//! The session never draws anything itself; it calls a [`Renderer`].

mod terminal;

pub use terminal::TerminalRenderer;

use crate::session::SessionStatus;
use chat_core::{ChatEnvelope, PresenceSet};

/// Rendering collaborator
pub trait Renderer {
    /// Show a chat line
    fn render_message(&mut self, envelope: &ChatEnvelope, is_private: bool);

    /// Show the online users. The local user is listed first when known.
    fn render_presence_list(&mut self, users: &PresenceSet, local_username: Option<&str>);

    fn render_connection_status(&mut self, status: SessionStatus, label: &str);

    /// Show a typing notice, or clear it with `None`
    fn render_typing_indicator(&mut self, text: Option<&str>);

    fn render_system_message(&mut self, text: &str);

    /// Show the online user count as reported by the server
    fn render_user_count(&mut self, text: &str);

    /// Blocking prompt for input the user has to fix
    fn render_alert(&mut self, text: &str);
}
