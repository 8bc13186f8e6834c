//! Scripted storage backend for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::{TokenError, TokenResult};

use super::backend::StorageBackend;

/// Mock backend recording every call, with injectable failures
#[derive(Default)]
pub struct MockBackend {
    records: Mutex<HashMap<String, (String, u64)>>,
    occupied_probes: Mutex<usize>,
    next_error: Mutex<Option<TokenError>>,
    should_fail: Mutex<bool>,
    get_history: Mutex<Vec<String>>,
    set_history: Mutex<Vec<(String, String, u64)>>,
    refresh_history: Mutex<Vec<String>>,
    del_history: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Create new mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a backend failure.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Return `error` from the next operation.
    pub fn set_next_error(&self, error: TokenError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Report the next `count` probed keys as already taken.
    pub fn occupy_next_probes(&self, count: usize) -> &Self {
        *self.occupied_probes.lock().unwrap() = count;
        self
    }

    /// Pre-populate a record.
    pub fn insert(&self, key: &str, payload: &str, ttl_seconds: u64) -> &Self {
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), (payload.to_string(), ttl_seconds));
        self
    }

    pub fn get_history(&self) -> Vec<String> {
        self.get_history.lock().unwrap().clone()
    }

    pub fn set_history(&self) -> Vec<(String, String, u64)> {
        self.set_history.lock().unwrap().clone()
    }

    pub fn refresh_history(&self) -> Vec<String> {
        self.refresh_history.lock().unwrap().clone()
    }

    pub fn del_history(&self) -> Vec<String> {
        self.del_history.lock().unwrap().clone()
    }

    fn check_error(&self) -> TokenResult<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(TokenError::backend("mock", "Mock storage failure"));
        }

        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get(&self, key: &str) -> TokenResult<String> {
        self.get_history.lock().unwrap().push(key.to_string());
        self.check_error()?;

        {
            let mut occupied = self.occupied_probes.lock().unwrap();
            if *occupied > 0 {
                *occupied -= 1;
                return Ok("taken".to_string());
            }
        }

        self.records
            .lock()
            .unwrap()
            .get(key)
            .map(|(payload, _)| payload.clone())
            .ok_or(TokenError::InvalidKey)
    }

    async fn set(&self, key: &str, payload: &str, ttl_seconds: u64) -> TokenResult<()> {
        self.check_error()?;

        self.set_history
            .lock()
            .unwrap()
            .push((key.to_string(), payload.to_string(), ttl_seconds));
        self.insert(key, payload, ttl_seconds);
        Ok(())
    }

    async fn refresh(&self, key: &str) -> TokenResult<()> {
        self.check_error()?;
        self.refresh_history.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> TokenResult<()> {
        self.check_error()?;
        self.del_history.lock().unwrap().push(key.to_string());
        self.records.lock().unwrap().remove(key);
        Ok(())
    }
}
