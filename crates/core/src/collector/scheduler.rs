//! Periodic background collection.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::TrendCollector;

/// Runs [`TrendCollector::run_collection`] on a fixed interval.
///
/// The first run happens one interval after `start`. A failed run is logged
/// and the loop keeps going.
pub struct CollectionScheduler {
    collector: Arc<TrendCollector>,
    interval: Duration,
    running: Arc<AtomicBool>,
    completed_runs: Arc<AtomicU64>,
    shutdown_tx: broadcast::Sender<()>,
}

impl CollectionScheduler {
    pub fn new(collector: Arc<TrendCollector>, interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            collector,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            completed_runs: Arc::new(AtomicU64::new(0)),
            shutdown_tx,
        }
    }

    /// Start the background loop.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Collection scheduler already running");
            return;
        }

        let running = Arc::clone(&self.running);
        let completed_runs = Arc::clone(&self.completed_runs);
        let collector = Arc::clone(&self.collector);
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!(interval_secs = interval.as_secs(), "Starting collection scheduler");

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Collection scheduler received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        match collector.run_collection().await {
                            Ok(report) => {
                                info!(genres = report.results.len(), "Scheduled collection finished");
                            }
                            Err(e) => {
                                error!(error = %e, "Scheduled collection failed");
                            }
                        }
                        completed_runs.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
            info!("Collection scheduler stopped");
        });
    }

    /// Signal the loop to stop. A run already in progress finishes first.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Collection scheduler not running");
            return;
        }

        info!("Stopping collection scheduler");
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Runs attempted since start, successful or not.
    pub fn completed_runs(&self) -> u64 {
        self.completed_runs.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::TrendResearcher;
    use crate::store::{StoreError, TrendStore};
    use crate::testing::{fixtures, MockResearcher, MockTrendStore};

    async fn wait_for_runs(scheduler: &CollectionScheduler, runs: u64) -> bool {
        for _ in 0..100 {
            if scheduler.completed_runs() >= runs {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_runs_periodically_until_stopped() {
        let store = Arc::new(MockTrendStore::new());
        store.add_genre("Jazz");
        let researcher = Arc::new(MockResearcher::new());
        researcher
            .set_trends("Jazz", vec![fixtures::raw_trend("Spotify", "Lo-fi revival")])
            .await;

        let collector = Arc::new(TrendCollector::new(
            Arc::clone(&store) as Arc<dyn TrendStore>,
            Arc::clone(&researcher) as Arc<dyn TrendResearcher>,
        ));
        let scheduler = CollectionScheduler::new(collector, Duration::from_millis(20));

        scheduler.start();
        assert!(scheduler.is_running());
        assert!(wait_for_runs(&scheduler, 2).await);

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(researcher.recorded_calls().await.len() >= 2);
        // Upserts are idempotent across runs.
        assert_eq!(store.trend_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_run_does_not_stop_loop() {
        let store = Arc::new(MockTrendStore::new());
        store.add_genre("Jazz");
        store.fail_list_genres(StoreError::Database("locked".to_string()));
        let researcher = Arc::new(MockResearcher::new());

        let collector = Arc::new(TrendCollector::new(
            Arc::clone(&store) as Arc<dyn TrendStore>,
            Arc::clone(&researcher) as Arc<dyn TrendResearcher>,
        ));
        let scheduler = CollectionScheduler::new(collector, Duration::from_millis(20));

        scheduler.start();
        assert!(wait_for_runs(&scheduler, 2).await);
        scheduler.stop();

        // The first run failed on listing; the second reached the researcher.
        assert!(!researcher.recorded_calls().await.is_empty());
    }
}
