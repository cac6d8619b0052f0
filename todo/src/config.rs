//! Configuration management for the todo service.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to the default.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Todo store configuration
    pub store: StoreConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Start with the three seed todos
    pub seed_data: bool,
    /// Maximum wait for a command outcome, in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                host: lookup("TODO_HOST").unwrap_or(defaults.server.host),
                port: parse_or(lookup("TODO_PORT"), defaults.server.port),
                shutdown_timeout: parse_or(
                    lookup("TODO_SHUTDOWN_TIMEOUT"),
                    defaults.server.shutdown_timeout,
                ),
            },
            store: StoreConfig {
                seed_data: parse_or(lookup("TODO_SEED_DATA"), defaults.store.seed_data),
                request_timeout_ms: parse_or(
                    lookup("TODO_REQUEST_TIMEOUT_MS"),
                    defaults.store.request_timeout_ms,
                ),
            },
        }
    }

    /// Get the server bind address (host:port).
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Command outcome timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.store.request_timeout_ms)
    }

    /// Graceful shutdown timeout as a [`Duration`].
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5145,
                shutdown_timeout: 10,
            },
            store: StoreConfig {
                seed_data: true,
                request_timeout_ms: 5000,
            },
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
