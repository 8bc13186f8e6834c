//! Shared helpers for the infrastructure integration tests

#![allow(dead_code)]

use std::time::Duration;

use tokio::time::sleep;

use tv_core::{StorageBackend, TokenError, TokenManager, MAX_TTL_SECONDS};
use tv_shared::config::{CacheConfig, LoggingConfig};

pub fn init_tracing() {
    let _ = tv_shared::init_tracing(&LoggingConfig::default());
}

/// Redis URL for ignored tests, overridable with `REDIS_URL`
pub fn redis_config(prefix: &str) -> CacheConfig {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    CacheConfig::new(url).with_prefix(prefix)
}

/// Full lifecycle every backend must honour in the same way
pub async fn lifecycle_scenario<B: StorageBackend>(manager: &TokenManager<B>) -> anyhow::Result<()> {
    let token = manager.new_token(r#"{"user_id":42}"#, 2).await?;
    assert_eq!(token.len(), 128);
    assert_eq!(manager.validate_token(&token).await?, r#"{"user_id":42}"#);

    // Unknown keys are misses on every backend
    assert!(matches!(
        manager.validate_token("no-such-token").await,
        Err(TokenError::InvalidKey)
    ));
    manager.refresh_token("no-such-token").await?;
    manager.delete_token("no-such-token").await?;

    // Out-of-range lifetimes are rejected by the backend itself
    for ttl in [0, MAX_TTL_SECONDS + 1] {
        assert!(matches!(
            manager.backend().set("bad-ttl", "x", ttl).await,
            Err(TokenError::InvalidTtl { .. })
        ));
    }
    assert!(manager.validate_token("bad-ttl").await.unwrap_err().is_invalid_key());

    // Refresh restarts the full window
    sleep(Duration::from_millis(1_200)).await;
    manager.refresh_token(&token).await?;
    sleep(Duration::from_millis(1_200)).await;
    assert_eq!(manager.validate_token(&token).await?, r#"{"user_id":42}"#);

    // Then the token lapses
    sleep(Duration::from_millis(2_500)).await;
    assert!(manager.validate_token(&token).await.unwrap_err().is_invalid_key());

    // Refreshing a lapsed token never revives it
    manager.refresh_token(&token).await?;
    assert!(manager.validate_token(&token).await.unwrap_err().is_invalid_key());

    // Deletion is immediate
    let other = manager.new_token("second", 60).await?;
    manager.delete_token(&other).await?;
    assert!(manager.validate_token(&other).await.unwrap_err().is_invalid_key());

    Ok(())
}
