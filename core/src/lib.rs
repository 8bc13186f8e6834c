//! # TokenVault Core
//!
//! Token lifecycle engine for request-authentication middleware.
//! This crate issues, validates, refreshes and revokes short-lived opaque
//! tokens that bind a payload to a random key, over a pluggable storage
//! backend.

pub mod domain;
pub mod errors;
pub mod services;
pub mod storage;

// Re-export commonly used types for convenience
pub use domain::{TokenRecord, MAX_TTL_SECONDS, TOKEN_ENTROPY_BYTES, TOKEN_LENGTH};
pub use errors::{TokenError, TokenResult};
pub use services::{TokenGenerator, TokenManager, TokenManagerConfig};
pub use storage::{InMemoryBackend, StorageBackend, SweepReport, SweeperConfig};
