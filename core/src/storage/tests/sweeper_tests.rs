//! Tests for background reclamation

use std::time::Duration;

use tokio::time::sleep;

use tv_shared::config::TokenConfig;

use crate::storage::{InMemoryBackend, StorageBackend, SweepReport, SweeperConfig};

#[tokio::test]
async fn test_sweeper_starts_lazily_on_first_set() {
    let storage = InMemoryBackend::with_config(SweeperConfig::every(Duration::from_secs(60)));
    assert!(!storage.is_sweeper_running());

    storage.get("nothing").await.unwrap_err();
    assert!(!storage.is_sweeper_running());

    storage.set("key-1", "user-1", 60).await.unwrap();
    assert!(storage.is_sweeper_running());

    storage.set("key-2", "user-2", 60).await.unwrap();
    assert!(storage.is_sweeper_running());
}

#[tokio::test]
async fn test_disabled_sweeper_never_starts() {
    let storage = InMemoryBackend::with_config(SweeperConfig::disabled());

    storage.set("key-1", "user-1", 60).await.unwrap();

    assert!(!storage.is_sweeper_running());
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_reclaims_expired_records() {
    let storage = InMemoryBackend::with_config(SweeperConfig::every(Duration::from_secs(1)));

    for i in 0..50 {
        storage.set(&format!("short-{}", i), "x", 1).await.unwrap();
    }
    for i in 0..3 {
        storage.set(&format!("long-{}", i), "y", 60).await.unwrap();
    }
    assert_eq!(storage.len().await, 53);

    // At least two sweep intervals after the short records expired
    sleep(Duration::from_secs(3)).await;

    assert_eq!(storage.len().await, 3);
    assert_eq!(storage.get("long-0").await.unwrap(), "y");
}

#[tokio::test(start_paused = true)]
async fn test_manual_sweep_reports_evictions() {
    let storage = InMemoryBackend::with_config(SweeperConfig::disabled());
    storage.set("expired", "x", 1).await.unwrap();
    storage.set("alive", "y", 60).await.unwrap();

    sleep(Duration::from_secs(2)).await;
    let report = storage.sweep_expired().await;

    assert_eq!(
        report,
        SweepReport {
            scanned: 2,
            evicted: 1
        }
    );
    assert_eq!(storage.len().await, 1);
}

#[tokio::test]
async fn test_dropping_backend_releases_table() {
    let storage = InMemoryBackend::with_config(SweeperConfig::every(Duration::from_millis(10)));
    storage.set("key-1", "user-1", 60).await.unwrap();
    let table = storage.table_handle();
    assert!(table.upgrade().is_some());

    drop(storage);

    assert!(table.upgrade().is_none());
}

#[test]
fn test_sweeper_restarts_on_a_new_runtime() {
    let storage = InMemoryBackend::with_config(SweeperConfig::every(Duration::from_millis(20)));

    let first = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    first.block_on(async {
        storage.set("survivor", "user-0", 60).await.unwrap();
        assert!(storage.is_sweeper_running());
    });
    // The sweeper task is cancelled together with its runtime
    drop(first);
    assert!(!storage.is_sweeper_running());

    let second = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    second.block_on(async {
        for i in 0..100 {
            storage.set(&format!("short-{}", i), "x", 1).await.unwrap();
        }
        assert!(storage.is_sweeper_running());

        sleep(Duration::from_millis(1_300)).await;

        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.get("survivor").await.unwrap(), "user-0");
    });
}

#[test]
fn test_sweeper_config_from_token_config() {
    let settings = TokenConfig {
        sweep_interval_seconds: 0,
        sweeper_enabled: false,
        ..Default::default()
    };

    let config = SweeperConfig::from(&settings);

    assert_eq!(config.interval, Duration::from_secs(1));
    assert!(!config.enabled);
}
