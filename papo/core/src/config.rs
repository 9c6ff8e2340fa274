//! Client Configuration
//!
//! Where the relay lives, which name to announce first, and how patient to be
//! while connecting.
//!
//! Environment variables:
//! - `CHAT_RELAY_URL`: relay endpoint (default `ws://localhost:3000/ws`)
//! - `CHAT_USERNAME`: initial display name (default `Guest`)
//! - `CHAT_CONNECT_TIMEOUT`: connection timeout in ms (default 5000)
//! - `CHAT_CHANNEL_CAPACITY`: transport channel capacity (default 100)

use std::time::Duration;

use crate::identity::DEFAULT_USERNAME;

/// Default relay endpoint
pub const DEFAULT_RELAY_URL: &str = "ws://localhost:3000/ws";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The relay URL is not a WebSocket URL
    #[error("relay URL must start with ws:// or wss://, got {0:?}")]
    InvalidRelayUrl(String),
    /// A numeric setting must be greater than zero
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Relay endpoint
    pub relay_url: String,
    /// Display name announced when the connection opens
    pub username: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Capacity of the transport's inbound and outbound channels
    pub channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            connect_timeout_ms: 5000,
            channel_capacity: 100,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            relay_url: lookup("CHAT_RELAY_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.relay_url),
            username: lookup("CHAT_USERNAME")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.username),
            connect_timeout_ms: lookup("CHAT_CONNECT_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_ms),
            channel_capacity: lookup("CHAT_CHANNEL_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.channel_capacity),
        }
    }

    /// Replace settings that were given explicitly (command line beats environment)
    #[must_use]
    pub fn with_overrides(
        mut self,
        relay_url: Option<String>,
        username: Option<String>,
        connect_timeout_ms: Option<u64>,
    ) -> Self {
        if let Some(url) = relay_url {
            self.relay_url = url;
        }
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(timeout) = connect_timeout_ms {
            self.connect_timeout_ms = timeout;
        }
        self
    }

    /// Connection timeout as a [`Duration`]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Check the configuration before connecting
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-WebSocket relay URL or a zero
    /// timeout/capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.relay_url.trim();
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidRelayUrl(self.relay_url.clone()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Zero("connect timeout"));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Zero("channel capacity"));
        }
        Ok(())
    }
}
