//! Storage backend trait defining the contract every token store satisfies.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::TokenResult;

/// Uniform contract for storing token payloads with an expiry
///
/// Implementations must behave identically from the caller's point of view:
/// - `get` fails with `TokenError::InvalidKey` when the key is absent or expired,
///   and with `TokenError::BackendFailure` only for transport/storage problems
/// - `set` creates or overwrites a record valid for `ttl_seconds`
/// - `refresh` restarts the record's original window; absent or expired keys are a no-op
/// - `del` is idempotent
///
/// All methods are called concurrently from many tasks.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short backend name used in logs and error reports
    fn name(&self) -> &'static str;

    /// Returns the payload bound to `key`
    async fn get(&self, key: &str) -> TokenResult<String>;

    /// Stores `payload` under `key` for `ttl_seconds`
    async fn set(&self, key: &str, payload: &str, ttl_seconds: u64) -> TokenResult<()>;

    /// Restarts the validity window of a live key
    async fn refresh(&self, key: &str) -> TokenResult<()>;

    /// Removes `key`
    async fn del(&self, key: &str) -> TokenResult<()>;
}

#[async_trait]
impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn get(&self, key: &str) -> TokenResult<String> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, payload: &str, ttl_seconds: u64) -> TokenResult<()> {
        (**self).set(key, payload, ttl_seconds).await
    }

    async fn refresh(&self, key: &str) -> TokenResult<()> {
        (**self).refresh(key).await
    }

    async fn del(&self, key: &str) -> TokenResult<()> {
        (**self).del(key).await
    }
}
