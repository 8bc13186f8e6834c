//! Cache module for Redis-based storage
//!
//! This module provides the Redis client used by the remote token backend,
//! with connection retry on startup and basic key operations.

pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use tv_shared::config::CacheConfig;
