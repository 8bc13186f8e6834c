//! In-memory token backend
//!
//! A single `RwLock`-guarded table owned by one backend instance. Reads take
//! the read lock, writes take the write lock, and a lazily started sweeper
//! evicts expired records in the background.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::entities::token::TokenRecord;
use crate::errors::{TokenError, TokenResult};
use crate::services::token::mask_token;

use super::backend::StorageBackend;
use super::sweeper::{self, SweepReport, SweeperConfig};

/// Key -> record table shared between the backend and its sweeper
#[derive(Default)]
pub(crate) struct RecordTable {
    pub(crate) records: RwLock<HashMap<String, TokenRecord>>,
}

/// Default `StorageBackend`: a process-local table with background expiry
///
/// Dropping the backend stops its sweeper and discards every token it holds.
pub struct InMemoryBackend {
    table: Arc<RecordTable>,
    config: SweeperConfig,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl InMemoryBackend {
    /// Create a backend that sweeps once per minute
    pub fn new() -> Self {
        Self::with_config(SweeperConfig::default())
    }

    /// Create a backend with a custom sweeper configuration
    pub fn with_config(config: SweeperConfig) -> Self {
        Self {
            table: Arc::new(RecordTable::default()),
            config,
            sweeper: Mutex::new(None),
        }
    }

    /// Number of stored records, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.table.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run one sweep pass now instead of waiting for the next tick
    pub async fn sweep_expired(&self) -> SweepReport {
        sweeper::sweep(&self.table).await
    }

    /// Whether the background sweeper task is alive
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Make sure a live sweeper task exists
    ///
    /// A sweeper dies with the runtime that spawned it, so a finished handle
    /// is replaced by a task on the caller's runtime.
    fn ensure_sweeper(&self) {
        if !self.config.enabled {
            return;
        }

        let mut slot = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        if slot.is_some() {
            warn!("Token sweeper stopped unexpectedly, restarting");
        }
        *slot = Some(sweeper::spawn(Arc::downgrade(&self.table), self.config.interval));
    }

    #[cfg(test)]
    pub(crate) fn table_handle(&self) -> std::sync::Weak<RecordTable> {
        Arc::downgrade(&self.table)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InMemoryBackend {
    fn drop(&mut self) {
        let slot = self.sweeper.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> TokenResult<String> {
        let records = self.table.records.read().await;

        match records.get(key) {
            Some(record) if record.is_valid_at(Instant::now()) => Ok(record.payload.clone()),
            _ => Err(TokenError::InvalidKey),
        }
    }

    async fn set(&self, key: &str, payload: &str, ttl_seconds: u64) -> TokenResult<()> {
        TokenRecord::check_ttl(ttl_seconds)?;
        let record = TokenRecord::new(payload, ttl_seconds);

        {
            let mut records = self.table.records.write().await;
            records.insert(key.to_string(), record);
        }
        debug!("Stored token {} for {}s", mask_token(key), ttl_seconds);

        self.ensure_sweeper();
        Ok(())
    }

    async fn refresh(&self, key: &str) -> TokenResult<()> {
        let mut records = self.table.records.write().await;
        let now = Instant::now();

        // Expired tokens can't be refreshed.
        if let Some(record) = records.get_mut(key).filter(|record| record.is_valid_at(now)) {
            record.refresh_at(now);
        }

        Ok(())
    }

    async fn del(&self, key: &str) -> TokenResult<()> {
        let removed = self.table.records.write().await.remove(key).is_some();
        if removed {
            debug!("Deleted token {}", mask_token(key));
        }
        Ok(())
    }
}
