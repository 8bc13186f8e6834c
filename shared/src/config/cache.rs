//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every token key
    pub key_prefix: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Attempts made to establish the initial connection
    pub max_connect_retries: u32,

    /// Base delay between connection attempts (exponential backoff)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: default_key_prefix(),
            connection_timeout: 5,
            max_connect_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all token keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the connection retry policy
    pub fn with_connect_retries(mut self, attempts: u32, delay_ms: u64) -> Self {
        self.max_connect_retries = attempts.max(1);
        self.retry_delay_ms = delay_ms;
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

fn default_key_prefix() -> String {
    String::from("tokenvault:auth")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.max_connect_retries, 3);
    }

    #[test]
    fn test_cache_config_with_prefix() {
        let config = CacheConfig::new("redis://cache:6379").with_prefix("sessions");
        assert_eq!(config.make_key("abc"), "sessions:abc");
    }

    #[test]
    fn test_cache_key_without_prefix() {
        let config = CacheConfig::default().with_prefix("");
        assert_eq!(config.make_key("abc"), "abc");
    }

    #[test]
    fn test_connect_retries_never_zero() {
        let config = CacheConfig::default().with_connect_retries(0, 10);
        assert_eq!(config.max_connect_retries, 1);
    }
}
