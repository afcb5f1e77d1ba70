//! Configuration structs

mod app_config;

pub use app_config::{
    AppSettings, BrokerConfig, ClientConfig, ConfigError, Environment, LoggingConfig, TypingConfig,
};
