//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key forwarded to the upstream auction endpoint
    pub api_key: String,
    /// HTTP server port
    pub server_port: u16,
    /// Path of the cache snapshot file
    pub cache_file: PathBuf,
    /// Interval in seconds between cache snapshots
    pub persist_interval: u64,
    /// Base URL of the upstream API
    pub upstream_base_url: String,
    /// Timeout in seconds for a single upstream page fetch
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_KEY` - Upstream API key (default: empty)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_FILE` - Cache snapshot path (default: cache.json)
    /// - `PERSIST_INTERVAL` - Snapshot frequency in seconds (default: 60)
    /// - `UPSTREAM_BASE_URL` - Upstream API root (default: https://api.hypixel.net)
    /// - `UPSTREAM_TIMEOUT` - Page fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("API_KEY").unwrap_or(defaults.api_key),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_file: env::var("CACHE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            persist_interval: parse_var("PERSIST_INTERVAL").unwrap_or(defaults.persist_interval),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
        }
    }

    /// Upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            server_port: 3000,
            cache_file: PathBuf::from("cache.json"),
            persist_interval: 60,
            upstream_base_url: "https://api.hypixel.net".to_string(),
            upstream_timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_file, PathBuf::from("cache.json"));
        assert_eq!(config.persist_interval, 60);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_FILE");
        env::remove_var("PERSIST_INTERVAL");
        env::remove_var("UPSTREAM_BASE_URL");
        env::remove_var("UPSTREAM_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_file, PathBuf::from("cache.json"));
        assert_eq!(config.persist_interval, 60);
        assert_eq!(config.upstream_base_url, "https://api.hypixel.net");
        assert_eq!(config.upstream_timeout, 30);
    }
}
