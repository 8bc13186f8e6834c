//! Token lifecycle error types.

use thiserror::Error;

/// Errors raised by token generation and by storage backends
///
/// `InvalidKey` is the only "not authenticated" signal. Every other variant is
/// an operational failure that callers should surface as a service error.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The key is absent or its record has expired
    #[error("Invalid key")]
    InvalidKey,

    /// No usable token could be produced
    #[error("Token generation failed: {reason}")]
    GenerationFailure { reason: String },

    /// The storage layer could not complete the operation
    #[error("Storage backend '{backend}' failed: {message}")]
    BackendFailure { backend: String, message: String },

    /// The requested lifetime can never produce a valid token
    #[error("Invalid token TTL: {ttl_seconds}s")]
    InvalidTtl { ttl_seconds: u64 },
}

impl TokenError {
    /// Build a backend failure for the named backend
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendFailure {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// True when the token is simply unknown or expired
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey)
    }

    /// True for transport and storage failures
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::BackendFailure { .. })
    }
}

pub type TokenResult<T> = Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_predicates() {
        assert!(TokenError::InvalidKey.is_invalid_key());
        assert!(!TokenError::InvalidKey.is_backend_failure());

        let err = TokenError::backend("redis", "connection refused");
        assert!(err.is_backend_failure());
        assert!(!err.is_invalid_key());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(TokenError::InvalidKey.to_string(), "Invalid key");
        assert_eq!(
            TokenError::backend("redis", "timeout").to_string(),
            "Storage backend 'redis' failed: timeout"
        );
        assert_eq!(
            TokenError::InvalidTtl { ttl_seconds: 0 }.to_string(),
            "Invalid token TTL: 0s"
        );
    }
}
