//! Tracing and logging setup
//!
//! The terminal renderer owns stdout, so every subscriber built here writes
//! to stderr. `RUST_LOG` overrides the preset filter when set.

use crate::config::{ClientConfig, Environment};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// WebSocket crates log every frame at debug; keep them quiet
const DEPENDENCY_DIRECTIVES: &[&str] = &["tungstenite=warn", "tokio_tungstenite=warn"];

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single line per event, fits next to chat output
    Compact,
    /// Multi-line with source locations
    Pretty,
    /// One JSON object per line
    Json,
}

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the chat crates
    pub level: Level,
    pub format: LogFormat,
    /// Log span open/close, useful to follow a connection task
    pub span_events: bool,
    /// Include file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

impl TracingConfig {
    /// Warnings only, so the chat stays readable in a shared terminal
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            span_events: false,
            file_line: false,
        }
    }

    /// Debug logging with source locations, for chasing session bugs
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            span_events: true,
            file_line: true,
        }
    }

    /// JSON logs at info, for piping stderr into a collector
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            span_events: false,
            file_line: false,
        }
    }

    /// Pick a preset from the client configuration
    ///
    /// Development stays on the interactive preset; `RUST_LOG=debug` is the
    /// way to get more. `LOG_JSON` forces JSON output.
    #[must_use]
    pub fn for_client(config: &ClientConfig) -> Self {
        let mut tracing = match config.app.env {
            Environment::Production => Self::production(),
            Environment::Staging => Self {
                level: Level::INFO,
                ..Self::interactive()
            },
            Environment::Development => Self::interactive(),
        };
        if config.logging.json {
            tracing.format = LogFormat::Json;
        }
        tracing
    }

    /// Filter directives used when `RUST_LOG` is not set
    #[must_use]
    pub fn directives(&self) -> String {
        let level = self.level.to_string().to_ascii_lowercase();
        let mut directives = vec![level.clone()];
        for krate in ["chat_client", "chat_common", "chat_core"] {
            directives.push(format!("{krate}={level}"));
        }
        directives.extend(DEPENDENCY_DIRECTIVES.iter().map(|d| (*d).to_string()));
        directives.join(",")
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }
}

/// Try to install the interactive preset
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::interactive())
}

/// Install a subscriber writing to stderr
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.file_line)
        .with_line_number(config.file_line)
        .with_span_events(config.span_events());

    let result = match config.format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
    result.map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
