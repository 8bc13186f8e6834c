//! Redis-backed token storage
//!
//! Each token is a single Redis string at `<key_prefix>:<token>` holding a
//! JSON envelope with the payload and the original TTL, written with
//! `SET .. EX ttl`. Refresh reads the envelope and reapplies the stored TTL
//! with `EXPIRE`, so the window restarts exactly as it does in memory.
//!
//! A cache miss is `TokenError::InvalidKey`; a transport error is
//! `TokenError::BackendFailure` and is never reported as a miss.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tv_core::domain::TokenRecord;
use tv_core::errors::{TokenError, TokenResult};
use tv_core::services::token::mask_token;
use tv_core::storage::StorageBackend;
use tv_shared::config::CacheConfig;

use crate::cache::RedisClient;
use crate::InfrastructureError;

pub(crate) const BACKEND_NAME: &str = "redis";

/// Value stored under each token key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredToken {
    pub(crate) payload: String,
    pub(crate) ttl: u64,
}

impl StoredToken {
    pub(crate) fn encode(&self) -> TokenResult<String> {
        serde_json::to_string(self).map_err(|e| InfrastructureError::Serialization(e).into())
    }

    pub(crate) fn decode(raw: &str) -> TokenResult<Self> {
        serde_json::from_str(raw).map_err(|e| InfrastructureError::Serialization(e).into())
    }
}

/// Token backend stored in Redis
#[derive(Clone)]
pub struct RedisBackend {
    client: RedisClient,
}

impl RedisBackend {
    /// Connect to Redis and build the backend
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(config).await?;
        Ok(Self::new(client))
    }

    /// Build the backend over an existing client
    pub fn new(client: RedisClient) -> Self {
        info!(
            "Redis token backend ready (key prefix '{}')",
            client.config().key_prefix
        );
        Self { client }
    }

    /// Remaining lifetime of a token in seconds, as tracked by Redis
    pub async fn remaining_ttl(&self, token: &str) -> Result<Option<u64>, InfrastructureError> {
        self.client.ttl(&self.key(token)).await
    }

    fn key(&self, token: &str) -> String {
        self.client.config().make_key(token)
    }
}

/// Map the outcome of a `GET` to the storage contract
pub(crate) fn read_payload(
    result: Result<Option<String>, InfrastructureError>,
) -> TokenResult<String> {
    match result? {
        Some(raw) => StoredToken::decode(&raw).map(|entry| entry.payload),
        None => Err(TokenError::InvalidKey),
    }
}

#[async_trait]
impl StorageBackend for RedisBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn get(&self, key: &str) -> TokenResult<String> {
        read_payload(self.client.get(&self.key(key)).await)
    }

    async fn set(&self, key: &str, payload: &str, ttl_seconds: u64) -> TokenResult<()> {
        // Same bounds as the in-memory backend; Redis rejects EX 0 on its own.
        TokenRecord::check_ttl(ttl_seconds)?;
        let entry = StoredToken {
            payload: payload.to_string(),
            ttl: ttl_seconds,
        };

        self.client
            .set_with_expiry(&self.key(key), &entry.encode()?, ttl_seconds)
            .await?;
        debug!("Stored token {} in Redis for {}s", mask_token(key), ttl_seconds);
        Ok(())
    }

    async fn refresh(&self, key: &str) -> TokenResult<()> {
        let redis_key = self.key(key);

        let Some(raw) = self.client.get(&redis_key).await? else {
            return Ok(());
        };
        let entry = StoredToken::decode(&raw)?;

        // EXPIRE on a key that lapsed since the GET is a no-op, never a revival.
        let refreshed = self.client.expire(&redis_key, entry.ttl).await?;
        if refreshed {
            debug!("Refreshed token {} for {}s", mask_token(key), entry.ttl);
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> TokenResult<()> {
        self.client.delete(&self.key(key)).await?;
        Ok(())
    }
}
