//! Background history retention sweep.
//!
//! An hourly (by default) tokio task that prunes history entries older than
//! the retention window across all authors. It runs independently of request
//! handling: the store locks one author at a time, so foreground updates on
//! other authors never wait, and overlapping runs are harmless.

use crate::context::ContextStore;
use hearthline_config::HistorySettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Spawn the sweep task. Abort the returned handle to stop it.
pub fn spawn_history_sweep(
    store: Arc<ContextStore>,
    interval: Duration,
    retention: Duration,
) -> JoinHandle<()> {
    let retention = chrono::Duration::from_std(retention)
        .unwrap_or_else(|_| chrono::Duration::hours(24));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the sweep waits a
        // full interval before its first pass.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            debug!("Running history retention sweep");
            store.prune_history(retention).await;
        }
    })
}

/// Convenience wrapper reading cadence and retention from settings.
pub fn spawn_history_sweep_from(
    store: Arc<ContextStore>,
    settings: &HistorySettings,
) -> JoinHandle<()> {
    spawn_history_sweep(
        store,
        Duration::from_secs(settings.sweep_interval_secs),
        Duration::from_secs(settings.retention_secs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthline_config::ContextSettings;
    use hearthline_core::turn::Turn;

    #[tokio::test]
    async fn sweep_runs_without_disturbing_fresh_history() {
        let store = Arc::new(ContextStore::new(&ContextSettings::default()).unwrap());
        store
            .update("author-1", vec![Turn::user("author-1", "hello")])
            .await;

        let handle = spawn_history_sweep(
            Arc::clone(&store),
            Duration::from_millis(20),
            Duration::from_secs(86400),
        );

        // Let several sweep passes run against live traffic.
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(25)).await;
            store
                .update("author-2", vec![Turn::user("author-2", "still here")])
                .await;
        }

        // Fresh entries survive every pass.
        assert_eq!(store.get_history("author-1", None).await.len(), 1);
        assert!(!store.get_history("author-2", None).await.is_empty());

        handle.abort();
    }
}
