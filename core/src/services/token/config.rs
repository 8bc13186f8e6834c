//! Configuration for the token manager

use tv_shared::config::TokenConfig;

/// Configuration for the token manager
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// TTL used by `TokenManager::issue`, in seconds
    pub default_ttl_seconds: u64,
    /// Generate-and-probe rounds before `new_token` gives up
    pub max_generation_attempts: u32,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: 3600, // 1 hour
            max_generation_attempts: 8,
        }
    }
}

impl From<&TokenConfig> for TokenManagerConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            default_ttl_seconds: config.default_ttl_seconds,
            max_generation_attempts: config.max_generation_attempts.max(1),
        }
    }
}
