//! Token lifecycle configuration

use serde::{Deserialize, Serialize};

/// Storage backend used to hold issued tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local table with a background sweeper
    #[default]
    Memory,
    /// Remote Redis cache
    Redis,
}

/// Token issuing and reclamation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Which backend stores the issued tokens
    pub backend: BackendKind,

    /// TTL applied by `TokenManager::issue`, in seconds
    pub default_ttl_seconds: u64,

    /// Upper bound on generate-and-probe rounds for one new token
    pub max_generation_attempts: u32,

    /// How often the in-memory sweeper runs, in seconds
    pub sweep_interval_seconds: u64,

    /// Whether the in-memory sweeper is started at all
    pub sweeper_enabled: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            default_ttl_seconds: 3600, // 1 hour
            max_generation_attempts: 8,
            sweep_interval_seconds: 60,
            sweeper_enabled: true,
        }
    }
}

impl TokenConfig {
    /// Set the default token TTL
    pub fn with_default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl_seconds = seconds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_config_default() {
        let config = TokenConfig::default();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.default_ttl_seconds, 3600);
        assert_eq!(config.max_generation_attempts, 8);
        assert!(config.sweeper_enabled);
    }

    #[test]
    fn test_backend_kind_deserializes_lowercase() {
        let kind: BackendKind = serde_json::from_str("\"redis\"").unwrap();
        assert_eq!(kind, BackendKind::Redis);
    }
}
