//! # Infrastructure Layer
//!
//! This crate implements the infrastructure side of TokenVault. It provides
//! the Redis-backed token store, configuration loading and the startup
//! wiring that selects a backend and builds the token manager.
//!
//! ## Architecture
//!
//! - **Cache**: Redis client with connection retry
//! - **Storage**: `RedisBackend`, the remote implementation of `StorageBackend`
//! - **Config**: layered configuration (`.env`, TOML file, environment variables)

use std::sync::Arc;

use tv_core::services::token::TokenManager;
use tv_core::storage::{InMemoryBackend, StorageBackend, SweeperConfig};
use tv_shared::config::{AppConfig, BackendKind};

// Re-export core types for convenience
pub use tv_core::errors::*;

/// Cache module - Redis client and operations
pub mod cache;

/// Configuration loading
pub mod config;

/// Storage module - Redis token backend
pub mod storage;

pub use storage::RedisBackend;

/// Token manager over whichever backend was selected at startup
pub type SharedTokenManager = TokenManager<Arc<dyn StorageBackend>>;

/// Build the configured storage backend
///
/// The choice is made once, here, at startup; the manager never switches
/// backends behind the caller's back.
pub async fn build_backend(
    config: &AppConfig,
) -> Result<Arc<dyn StorageBackend>, InfrastructureError> {
    let backend: Arc<dyn StorageBackend> = match config.tokens.backend {
        BackendKind::Memory => Arc::new(InMemoryBackend::with_config(SweeperConfig::from(
            &config.tokens,
        ))),
        BackendKind::Redis => Arc::new(RedisBackend::connect(config.cache.clone()).await?),
    };

    tracing::info!("Token backend '{}' selected", backend.name());
    Ok(backend)
}

/// Build a token manager for an already loaded configuration
pub async fn build_manager(config: &AppConfig) -> Result<SharedTokenManager, InfrastructureError> {
    let backend = build_backend(config).await?;
    Ok(TokenManager::from_settings(backend, &config.tokens))
}

/// Load configuration and build a ready token manager
///
/// Logging is left to the host; call `tv_shared::init_tracing` first to see
/// the startup messages.
pub async fn initialize() -> Result<SharedTokenManager, InfrastructureError> {
    tracing::info!("Initializing token infrastructure...");

    let config = config::load_config()?;
    let manager = build_manager(&config).await?;

    tracing::info!(
        "Token infrastructure initialized ({} environment)",
        config.environment
    );
    Ok(manager)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration source error
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for TokenError {
    fn from(error: InfrastructureError) -> Self {
        TokenError::backend(storage::redis_backend::BACKEND_NAME, error.to_string())
    }
}
