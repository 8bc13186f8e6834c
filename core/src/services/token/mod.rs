//! Token service module for opaque session tokens
//!
//! This module handles all token-related operations including:
//! - Opaque token generation from OS entropy
//! - Uniqueness-checked issuing against the active backend
//! - Validation, refresh and revocation

mod config;
mod generator;
mod manager;

#[cfg(test)]
mod tests;

pub use config::TokenManagerConfig;
pub use generator::{EntropySource, OsEntropy, TokenGenerator};
pub use manager::TokenManager;

/// Shortened form of a token that is safe to log
pub fn mask_token(token: &str) -> String {
    match token.get(..8) {
        Some(prefix) if token.len() > 8 => format!("{}...", prefix),
        _ => "****".to_string(),
    }
}
