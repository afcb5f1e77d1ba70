//! STOMP frame codec
//!
//! A frame is a command line, `name:value` header lines, a blank line, the
//! body and a terminating NUL. Bare end-of-line sequences between frames are
//! heart-beats and carry nothing.

use super::StompCommand;
use thiserror::Error;

/// Versions offered in CONNECT
pub const ACCEPT_VERSION: &str = "1.2,1.1,1.0";

/// Frame terminator
const NUL: char = '\0';

/// Frame codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    #[error("invalid escape sequence in header: {0}")]
    InvalidEscape(String),
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StompFrame {
    pub command: StompCommand,
    headers: Vec<(String, String)>,
    pub body: String,
}

impl StompFrame {
    /// Create a frame with no headers and no body
    #[must_use]
    pub fn new(command: StompCommand) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Append a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    // === Client Frames ===

    /// CONNECT frame
    #[must_use]
    pub fn connect(host: &str) -> Self {
        Self::new(StompCommand::Connect)
            .header("accept-version", ACCEPT_VERSION)
            .header("host", host)
            .header("heart-beat", "0,0")
    }

    /// SUBSCRIBE frame
    #[must_use]
    pub fn subscribe(id: &str, destination: &str) -> Self {
        Self::new(StompCommand::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    /// SEND frame carrying a JSON body
    #[must_use]
    pub fn send(destination: &str, json_body: impl Into<String>) -> Self {
        let body = json_body.into();
        Self::new(StompCommand::Send)
            .header("destination", destination)
            .header("content-type", "application/json")
            .header("content-length", body.len().to_string())
            .with_body(body)
    }

    /// DISCONNECT frame
    #[must_use]
    pub fn disconnect() -> Self {
        Self::new(StompCommand::Disconnect)
    }

    // === Accessors ===

    /// Get a header value. When a header repeats, the first occurrence wins.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Human readable reason carried by an ERROR frame
    pub fn error_message(&self) -> String {
        match (self.get_header("message"), self.body.trim()) {
            (Some(message), "") => message.to_string(),
            (Some(message), body) => format!("{message}: {body}"),
            (None, "") => "broker reported an error".to_string(),
            (None, body) => body.to_string(),
        }
    }

    // === Codec ===

    /// Encode this frame for a WebSocket text message
    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(self.body.len() + 64);

        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push(NUL);
        out
    }

    /// Decode every frame contained in one text message
    ///
    /// Heart-beat EOLs are skipped, so a pure heart-beat yields an empty list.
    pub fn decode_all(text: &str) -> Result<Vec<Self>, FrameError> {
        text.split(NUL)
            .map(|chunk| chunk.trim_start_matches(['\r', '\n']))
            .filter(|chunk| !chunk.is_empty())
            .map(Self::decode)
            .collect()
    }

    /// Decode a single frame, with or without its trailing NUL
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let text = text.trim_start_matches(['\r', '\n']);
        let text = text.strip_suffix(NUL).unwrap_or(text);
        if text.is_empty() {
            return Err(FrameError::Empty);
        }

        let (head, body) = split_head(text);
        let mut lines = head.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

        let command_line = lines.next().ok_or(FrameError::Empty)?;
        let command = StompCommand::parse(command_line)
            .ok_or_else(|| FrameError::UnknownCommand(command_line.to_string()))?;
        let unescape = command.escapes_headers();

        let mut headers = Vec::new();
        for line in lines.filter(|line| !line.is_empty()) {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;

            if unescape {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        Ok(Self {
            command,
            headers,
            body: body.to_string(),
        })
    }
}

/// Split at the first blank line into (command + headers, body)
fn split_head(text: &str) -> (&str, &str) {
    if let Some(idx) = text.find("\n\n") {
        return (&text[..idx], &text[idx + 2..]);
    }
    if let Some(idx) = text.find("\r\n\r\n") {
        return (&text[..idx], &text[idx + 4..]);
    }
    (text, "")
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(value: &str) -> Result<String, FrameError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(FrameError::InvalidEscape(value.to_string())),
        }
    }
    Ok(out)
}
