//! Token manager: issues unique tokens and forwards lifecycle calls to the backend

use tracing::{debug, error, warn};

use tv_shared::config::TokenConfig;

use crate::domain::entities::token::TokenRecord;
use crate::errors::{TokenError, TokenResult};
use crate::storage::StorageBackend;

use super::config::TokenManagerConfig;
use super::generator::TokenGenerator;
use super::mask_token;

/// Facade over a storage backend for the whole token lifecycle
///
/// The backend is owned by the manager and chosen at construction time.
/// Share the manager behind an `Arc` to use it from many request handlers.
pub struct TokenManager<B: StorageBackend> {
    backend: B,
    generator: TokenGenerator,
    config: TokenManagerConfig,
}

impl<B: StorageBackend> TokenManager<B> {
    /// Creates a manager with default configuration
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, TokenManagerConfig::default())
    }

    /// Creates a manager with explicit configuration
    pub fn with_config(backend: B, config: TokenManagerConfig) -> Self {
        Self {
            backend,
            generator: TokenGenerator::new(),
            config,
        }
    }

    /// Creates a manager from the shared token settings
    pub fn from_settings(backend: B, settings: &TokenConfig) -> Self {
        Self::with_config(backend, TokenManagerConfig::from(settings))
    }

    /// Replaces the token generator
    pub fn with_generator(mut self, generator: TokenGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// The active backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &TokenManagerConfig {
        &self.config
    }

    /// Swaps in a new backend and returns the previous one
    ///
    /// Requires exclusive access, so it can only happen while no token
    /// operation is in flight (typically during startup). Tokens held by the
    /// previous backend are not migrated.
    pub fn register_backend(&mut self, backend: B) -> B {
        debug!(
            "Replacing token backend '{}' with '{}'",
            self.backend.name(),
            backend.name()
        );
        std::mem::replace(&mut self.backend, backend)
    }

    /// Issues a new token bound to `payload`, valid for `ttl_seconds`
    ///
    /// Each candidate is probed with `get`; an occupied key triggers a new
    /// candidate. With 512 bits of digest a retry essentially never happens,
    /// so the loop is a safeguard bounded by `max_generation_attempts`.
    ///
    /// # Errors
    /// * `TokenError::InvalidTtl` - `ttl_seconds` is zero or above `MAX_TTL_SECONDS`
    /// * `TokenError::GenerationFailure` - entropy failure or no free candidate
    /// * `TokenError::BackendFailure` - probe or store failed
    pub async fn new_token(&self, payload: &str, ttl_seconds: u64) -> TokenResult<String> {
        TokenRecord::check_ttl(ttl_seconds)?;

        let attempts = self.config.max_generation_attempts.max(1);
        for attempt in 1..=attempts {
            let candidate = self.generator.generate()?;

            match self.backend.get(&candidate).await {
                Ok(_) => {
                    warn!(
                        "Token candidate {} already in use (attempt {}/{})",
                        mask_token(&candidate),
                        attempt,
                        attempts
                    );
                }
                Err(TokenError::InvalidKey) => {
                    self.backend.set(&candidate, payload, ttl_seconds).await?;
                    debug!(
                        "Issued token {} on backend '{}' for {}s",
                        mask_token(&candidate),
                        self.backend.name(),
                        ttl_seconds
                    );
                    return Ok(candidate);
                }
                Err(e) => {
                    error!("Token uniqueness probe failed: {}", e);
                    return Err(e);
                }
            }
        }

        Err(TokenError::GenerationFailure {
            reason: format!("no free token after {} attempts", attempts),
        })
    }

    /// Issues a token with the configured default TTL
    pub async fn issue(&self, payload: &str) -> TokenResult<String> {
        self.new_token(payload, self.config.default_ttl_seconds).await
    }

    /// Returns the payload bound to `token`, or `TokenError::InvalidKey`
    pub async fn validate_token(&self, token: &str) -> TokenResult<String> {
        self.backend.get(token).await
    }

    /// Restarts the validity window of `token`; unknown or expired tokens are a no-op
    pub async fn refresh_token(&self, token: &str) -> TokenResult<()> {
        self.backend.refresh(token).await
    }

    /// Revokes `token`; revoking an unknown token is not an error
    pub async fn delete_token(&self, token: &str) -> TokenResult<()> {
        self.backend.del(token).await
    }

    /// Per-request check: validate the token, then extend its session
    ///
    /// Returns the bound payload. A token that expires between the two steps
    /// still authenticates this request; the refresh is then a no-op.
    pub async fn authenticate(&self, token: &str) -> TokenResult<String> {
        let payload = self.validate_token(token).await?;
        self.refresh_token(token).await?;
        Ok(payload)
    }
}

impl<B: StorageBackend> std::fmt::Debug for TokenManager<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}
