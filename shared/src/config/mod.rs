//! Configuration module with area-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection settings for the remote token backend
//! - `environment` - Environment detection and logging configuration
//! - `token` - Token lifecycle, backend selection and sweeper settings

pub mod cache;
pub mod environment;
pub mod token;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use token::{BackendKind, TokenConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Token lifecycle configuration
    pub tokens: TokenConfig,

    /// Redis cache configuration (used when `tokens.backend = "redis"`)
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            tokens: TokenConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            tokens: TokenConfig {
                backend: BackendKind::Redis,
                ..Default::default()
            },
            cache: CacheConfig::new("redis://cache:6379"),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }
}
