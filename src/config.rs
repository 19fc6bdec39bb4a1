//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Maximum number of tokens per queue, None = unbounded
    pub queue_capacity: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `QUEUE_CAPACITY` - Per-queue token limit (default: unbounded)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            queue_capacity: parse_var("QUEUE_CAPACITY").or(defaults.queue_capacity),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cleanup_interval: 60,
            queue_capacity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cleanup_interval, 60);
        assert!(config.queue_capacity.is_none());
    }

    // Env vars are process-wide, so every from_env case lives in one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("QUEUE_CAPACITY");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("SERVER_PORT", "9000");
        env::set_var("CLEANUP_INTERVAL", "not-a-number");
        env::set_var("QUEUE_CAPACITY", "100");
        let config = Config::from_env();
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.queue_capacity, Some(100));

        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("QUEUE_CAPACITY");
    }
}
