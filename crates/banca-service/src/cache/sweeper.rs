//! Background staleness sweeper.

use crate::cache::Sweep;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

/// Periodic sweep task over one or more caches.
///
/// Runs on its own schedule, independent of caller traffic. `shutdown()`
/// only prevents scheduling of the next sweep; already-cached entries stay
/// queryable, no further automatic eviction occurs.
pub struct CacheSweeper {
    interval: Duration,
    targets: Vec<(String, Arc<dyn Sweep>)>,
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

impl CacheSweeper {
    /// Creates a sweeper firing at the given interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            interval,
            targets: Vec::new(),
            shutdown_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registers a cache to be swept.
    pub fn register(&mut self, name: impl Into<String>, target: Arc<dyn Sweep>) {
        let name = name.into();
        debug!(cache = %name, "Registered cache for background sweeping");
        self.targets.push((name, target));
    }

    /// Whether the sweep loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the sweep loop on the current runtime.
    ///
    /// The first sweep fires one full interval after start, matching the
    /// cadence of the staleness window rather than sweeping fresh entries
    /// immediately.
    pub fn start(&self) -> JoinHandle<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            info!("Cache sweeper already running");
            return tokio::spawn(async {});
        }

        let targets = self.targets.clone();
        let period = self.interval;
        let running = Arc::clone(&self.running);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!(
            interval_secs = period.as_secs_f64(),
            caches = targets.len(),
            "Starting cache sweeper"
        );

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Cache sweeper received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        for (name, target) in &targets {
                            let removed = target.sweep();
                            if removed > 0 {
                                debug!(cache = %name, removed, "Sweep pass evicted stale entries");
                            }
                        }
                    }
                }
            }
            running.store(false, Ordering::SeqCst);
            info!("Cache sweeper stopped");
        })
    }

    /// Stops the sweep loop. Prevents the next sweep from being scheduled;
    /// a sweep already in progress completes.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl std::fmt::Debug for CacheSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSweeper")
            .field("interval", &self.interval)
            .field("targets", &self.targets.len())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingTarget {
        sweeps: AtomicUsize,
    }

    impl CountingTarget {
        fn new() -> Self {
            Self {
                sweeps: AtomicUsize::new(0),
            }
        }

        fn count(&self) -> usize {
            self.sweeps.load(Ordering::SeqCst)
        }
    }

    impl Sweep for CountingTarget {
        fn sweep(&self) -> usize {
            self.sweeps.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    #[tokio::test]
    async fn test_sweeper_fires_periodically() {
        let target = Arc::new(CountingTarget::new());
        let mut sweeper = CacheSweeper::new(Duration::from_millis(20));
        sweeper.register("clients", target.clone());

        let handle = sweeper.start();
        assert!(sweeper.is_running());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(target.count() >= 2);

        sweeper.shutdown();
        handle.await.unwrap();
        assert!(!sweeper.is_running());
    }

    #[tokio::test]
    async fn test_no_sweeps_after_shutdown() {
        let target = Arc::new(CountingTarget::new());
        let mut sweeper = CacheSweeper::new(Duration::from_millis(20));
        sweeper.register("clients", target.clone());

        let handle = sweeper.start();
        tokio::time::sleep(Duration::from_millis(60)).await;
        sweeper.shutdown();
        handle.await.unwrap();

        let count_at_shutdown = target.count();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(target.count(), count_at_shutdown);
    }

    #[tokio::test]
    async fn test_first_sweep_waits_one_interval() {
        let target = Arc::new(CountingTarget::new());
        let mut sweeper = CacheSweeper::new(Duration::from_millis(200));
        sweeper.register("clients", target.clone());

        let _handle = sweeper.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(target.count(), 0);

        sweeper.shutdown();
    }

    #[tokio::test]
    async fn test_sweeps_multiple_targets() {
        let a = Arc::new(CountingTarget::new());
        let b = Arc::new(CountingTarget::new());
        let mut sweeper = CacheSweeper::new(Duration::from_millis(20));
        sweeper.register("clients", a.clone());
        sweeper.register("cards", b.clone());

        let handle = sweeper.start();
        tokio::time::sleep(Duration::from_millis(70)).await;
        sweeper.shutdown();
        handle.await.unwrap();

        assert!(a.count() >= 1);
        assert!(b.count() >= 1);
    }
}
