//! Test fixtures and data generators
//!
//! Message bodies shaped like the ones the chat server publishes.

use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique username
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// Timestamp in the server's layout
pub const SERVER_TIMESTAMP: &str = "2026-03-14 09:26:53";

/// Body that is not JSON at all
pub const MALFORMED_BODY: &str = "{\"sender\": \"bob\", \"content\": ";

fn envelope(sender: &str, content: &str, message_type: &str) -> String {
    json!({
        "sender": sender,
        "content": content,
        "type": message_type,
        "timestamp": SERVER_TIMESTAMP,
    })
    .to_string()
}

/// JOIN as the server rebroadcasts it, with extra server fields
pub fn join_body(user: &str) -> String {
    json!({
        "sender": user,
        "content": format!("🆕 {user} has joined the chat"),
        "type": "JOIN",
        "timestamp": SERVER_TIMESTAMP,
        "sessionId": format!("session-{}", unique_suffix()),
        "processed": true,
    })
    .to_string()
}

pub fn leave_body(user: &str) -> String {
    envelope(user, &format!("{user} left the chat"), "LEAVE")
}

pub fn chat_body(sender: &str, content: &str) -> String {
    envelope(sender, content, "CHAT")
}

/// Private message as delivered to the recipient's queue
pub fn private_body(sender: &str, content: &str) -> String {
    envelope(sender, content, "PRIVATE")
}

pub fn typing_body(sender: &str) -> String {
    json!({ "sender": sender, "content": "", "type": "TYPING" }).to_string()
}

pub fn system_body(content: &str) -> String {
    envelope("System", content, "SYSTEM")
}

/// User count update as published on the user count topic
pub fn user_count_body(count: u32) -> String {
    envelope("System", &count.to_string(), "SYSTEM")
}

/// Envelope with a type this client does not know
pub fn unknown_type_body(sender: &str, content: &str) -> String {
    envelope(sender, content, "REACTION")
}
