//! Shared configuration and common plumbing for TokenVault
//!
//! This crate provides functionality used by every TokenVault crate:
//! - Configuration types (token lifecycle, Redis cache, logging, environment)
//! - Tracing subscriber initialisation

pub mod config;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, BackendKind, CacheConfig, Environment, LogFormat, LoggingConfig, TokenConfig,
};
pub use telemetry::init_tracing;
