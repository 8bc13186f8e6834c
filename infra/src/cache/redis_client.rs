//! Redis cache client implementation
//!
//! Thin async wrapper over a multiplexed Redis connection exposing the
//! handful of commands the token backend needs. The initial connection is
//! retried with exponential backoff; individual commands are attempted once
//! and their failures are reported to the caller unchanged.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use tv_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Maximum backoff between two connection attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis client sharing one multiplexed connection across tasks
///
/// Cloning is cheap; every clone talks over the same connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Connect to Redis using `config`
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Connected client or error
    ///
    /// # Example
    /// ```no_run
    /// use tv_infra::cache::RedisClient;
    /// use tv_shared::config::CacheConfig;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379");
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(&client, &config).await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn connect_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_attempts = config.max_connect_retries.max(1);
        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result = match timeout(connect_timeout, client.get_multiplexed_async_connection())
                .await
            {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connection attempt timed out",
                ))),
            };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_attempts && is_retriable_error(&e) => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Set a value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, expiry_seconds)
            .await
            .map_err(|e| {
                error!("Failed to set key '{}': {}", mask_key(key), e);
                InfrastructureError::Cache(e)
            })
    }

    /// Get a value from cache
    ///
    /// # Returns
    /// * `Ok(None)` - key absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let mut conn = self.connection.clone();
        conn.get::<_, Option<String>>(key).await.map_err(|e| {
            error!("Failed to get key '{}': {}", mask_key(key), e);
            InfrastructureError::Cache(e)
        })
    }

    /// Reset the expiry of an existing key
    ///
    /// # Returns
    /// * `Ok(false)` - the key did not exist, nothing was changed
    pub async fn expire(&self, key: &str, expiry_seconds: u64) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let seconds = i64::try_from(expiry_seconds).unwrap_or(i64::MAX);
        conn.expire::<_, bool>(key, seconds).await.map_err(|e| {
            error!("Failed to set expiry on key '{}': {}", mask_key(key), e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key from cache
    ///
    /// # Returns
    /// * `Ok(true)` if the key was deleted, `Ok(false)` if it was not found
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let deleted = conn.del::<_, u32>(key).await.map_err(|e| {
            error!("Failed to delete key '{}': {}", mask_key(key), e);
            InfrastructureError::Cache(e)
        })?;
        Ok(deleted > 0)
    }

    /// Remaining time-to-live of a key in seconds, `None` when absent or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let ttl = conn.ttl::<_, i64>(key).await.map_err(|e| {
            error!("Failed to get TTL for key '{}': {}", mask_key(key), e);
            InfrastructureError::Cache(e)
        })?;
        Ok(u64::try_from(ttl).ok())
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response != "PONG" {
            warn!("Redis health check returned unexpected response: {}", response);
        }
        Ok(response == "PONG")
    }
}

/// Check if a Redis error is transient and worth another connection attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask sensitive parts of Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(proto_end), Some(at_pos)) if at_pos > proto_end => {
            format!("{}****{}", &url[..proto_end + 3], &url[at_pos..])
        }
        _ => url.to_string(),
    }
}

/// Keep token-bearing keys out of logs
fn mask_key(key: &str) -> String {
    match key.rsplit_once(':') {
        Some((prefix, token)) => format!("{}:{}", prefix, tv_core::services::token::mask_token(token)),
        None => tv_core::services::token::mask_token(key),
    }
}
