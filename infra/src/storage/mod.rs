//! Remote token storage

pub mod redis_backend;


pub use redis_backend::RedisBackend;
