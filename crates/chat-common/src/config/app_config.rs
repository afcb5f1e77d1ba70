//! Client configuration structs
//!
//! Loads configuration from environment variables and an optional `.env` file.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub broker: BrokerConfig,
    pub typing: TypingConfig,
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Message broker connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// WebSocket endpoint speaking STOMP
    #[serde(default = "default_broker_url")]
    pub url: String,
    /// Value of the STOMP `host` header
    #[serde(default = "default_broker_host")]
    pub host: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl BrokerConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Typing indicator timings
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TypingConfig {
    /// Inactivity after which the local user stops being "typing"
    #[serde(default = "default_typing_idle_ms")]
    pub idle_ms: u64,
    /// How long a remote "is typing" notice stays visible
    #[serde(default = "default_typing_expiry_ms")]
    pub expiry_ms: u64,
}

impl TypingConfig {
    #[must_use]
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    #[must_use]
    pub fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms)
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            idle_ms: default_typing_idle_ms(),
            expiry_ms: default_typing_expiry_ms(),
        }
    }
}

/// Logging output settings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_app_name() -> String {
    "chat-client".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_broker_url() -> String {
    "ws://127.0.0.1:8080/ws".to_string()
}

fn default_broker_host() -> String {
    "localhost".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_typing_idle_ms() -> u64 {
    1_500
}

fn default_typing_expiry_ms() -> u64 {
    3_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            broker: BrokerConfig {
                url: default_broker_url(),
                host: default_broker_host(),
                connect_timeout_ms: default_connect_timeout_ms(),
            },
            typing: TypingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Every variable is optional; a present but unparsable value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => default_env(),
        };

        let url = lookup("BROKER_URL").unwrap_or_else(default_broker_url);
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue("BROKER_URL", url));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            broker: BrokerConfig {
                url,
                host: lookup("BROKER_HOST").unwrap_or_else(default_broker_host),
                connect_timeout_ms: parse_or(&lookup, "CONNECT_TIMEOUT_MS", default_connect_timeout_ms)?,
            },
            typing: TypingConfig {
                idle_ms: parse_or(&lookup, "TYPING_IDLE_MS", default_typing_idle_ms)?,
                expiry_ms: parse_or(&lookup, "TYPING_EXPIRY_MS", default_typing_expiry_ms)?,
            },
            logging: LoggingConfig {
                json: parse_or(&lookup, "LOG_JSON", || false)?,
            },
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    D: FnOnce() -> T,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
