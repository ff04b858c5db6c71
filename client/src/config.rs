//! Observer configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OBSERVER_URL: &str = "ws://localhost:8000/ws/observer";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 5000;
pub const DEFAULT_SESSION_FILE: &str = ".observer-session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid observer url '{0}' (expected ws:// or wss://)")]
    InvalidUrl(String),
    #[error("invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverConfig {
    pub url: String,
    pub reconnect_delay: Duration,
    pub notification_ttl: Duration,
    pub session_file: PathBuf,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OBSERVER_URL.to_owned(),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ObserverConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `OBSERVER_URL`: default `ws://localhost:8000/ws/observer`
    /// - `OBSERVER_RECONNECT_DELAY_MS`: default 3000
    /// - `OBSERVER_NOTIFICATION_TTL_MS`: default 5000
    /// - `OBSERVER_SESSION_FILE`: default `.observer-session.json`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let url = match lookup("OBSERVER_URL") {
            Some(url) => validate_url(&url)?,
            None => defaults.url,
        };
        let reconnect_delay = parse_millis(&lookup, "OBSERVER_RECONNECT_DELAY_MS", defaults.reconnect_delay)?;
        let notification_ttl = parse_millis(&lookup, "OBSERVER_NOTIFICATION_TTL_MS", defaults.notification_ttl)?;
        let session_file = lookup("OBSERVER_SESSION_FILE").map_or(defaults.session_file, PathBuf::from);

        Ok(Self { url, reconnect_delay, notification_ttl, session_file })
    }

    /// Replace the endpoint, rejecting non-websocket schemes.
    pub fn with_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.url = validate_url(url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

fn validate_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("ws://")
        .or_else(|| trimmed.strip_prefix("wss://"))
        .ok_or_else(|| ConfigError::InvalidUrl(raw.to_owned()))?;
    if rest.is_empty() {
        return Err(ConfigError::InvalidUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
