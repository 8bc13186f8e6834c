//! Opaque token generation
//!
//! A token is the hex-encoded SHA-512 digest of 256 bytes drawn from the
//! operating system's CSPRNG. Failure of the entropy source is reported as an
//! error and never turned into an empty or fixed token.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::sync::Arc;

use crate::domain::entities::token::TOKEN_ENTROPY_BYTES;
use crate::errors::{TokenError, TokenResult};

/// Source of random bytes for token generation
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with random bytes
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// Operating-system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

/// Produces high-entropy opaque token strings
#[derive(Clone)]
pub struct TokenGenerator {
    source: Arc<dyn EntropySource>,
}

impl TokenGenerator {
    /// Generator backed by the OS CSPRNG
    pub fn new() -> Self {
        Self::with_source(OsEntropy)
    }

    /// Generator backed by a custom entropy source
    pub fn with_source(source: impl EntropySource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Generate one candidate token (128 lowercase hex characters)
    pub fn generate(&self) -> TokenResult<String> {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        self.source
            .fill(&mut bytes)
            .map_err(|e| TokenError::GenerationFailure {
                reason: format!("entropy source failed: {}", e),
            })?;

        let digest = Sha512::digest(bytes);
        Ok(hex::encode(digest))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGenerator").finish_non_exhaustive()
    }
}
