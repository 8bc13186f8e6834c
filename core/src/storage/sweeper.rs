//! Background reclamation of expired in-memory records
//!
//! The sweeper wakes on a fixed, coarse interval that is independent of any
//! record's TTL. Expired-but-unswept records are already rejected on read, so
//! the sweeper only bounds memory growth.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use tv_shared::config::TokenConfig;

use super::memory::RecordTable;

/// Configuration for the in-memory sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Time between two sweeps
    pub interval: Duration,
    /// Whether the sweeper is started on first `set`
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60), // Run every minute
            enabled: true,
        }
    }
}

impl SweeperConfig {
    /// Sweep on the given interval
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            enabled: true,
        }
    }

    /// Never start a sweeper; expired records stay until overwritten or deleted
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

impl From<&TokenConfig> for SweeperConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.sweep_interval_seconds.max(1)),
            enabled: config.sweeper_enabled,
        }
    }
}

/// Outcome of one sweep pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Records present when the scan started
    pub scanned: usize,
    /// Expired records removed
    pub evicted: usize,
}

/// Run one reclamation pass over `table`
///
/// Expired keys are collected under the read lock. Each one is then removed
/// under its own short write lock, after re-checking expiry, since a `set` may
/// have replaced the record in between. Readers are never blocked for the
/// length of a full scan.
pub(crate) async fn sweep(table: &RecordTable) -> SweepReport {
    let scan_started = Instant::now();

    let (scanned, expired) = {
        let records = table.records.read().await;
        let expired: Vec<String> = records
            .iter()
            .filter(|(_, record)| record.is_expired_at(scan_started))
            .map(|(key, _)| key.clone())
            .collect();
        (records.len(), expired)
    };

    let mut evicted = 0;
    for key in expired {
        let mut records = table.records.write().await;
        let still_expired = records
            .get(&key)
            .is_some_and(|record| record.is_expired_at(Instant::now()));
        if still_expired {
            records.remove(&key);
            evicted += 1;
        }
    }

    SweepReport { scanned, evicted }
}

/// Spawn the periodic sweeper for `table`
///
/// The task only holds a weak reference: once the owning backend is dropped
/// the next tick finds nothing to upgrade and the task ends.
pub(crate) fn spawn(table: Weak<RecordTable>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Token sweeper started - will run every {} seconds",
            interval.as_secs_f64()
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(table) = table.upgrade() else {
                info!("Token sweeper stopped: backend dropped");
                break;
            };

            let report = sweep(&table).await;
            if report.evicted > 0 {
                debug!(
                    scanned = report.scanned,
                    evicted = report.evicted,
                    "Swept expired tokens"
                );
            }
        }
    })
}
