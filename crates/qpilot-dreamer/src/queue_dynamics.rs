//! Queue-dynamics cache and background monitor (§4.3, §5).
//!
//! Grounded on `arvak-sched::matcher::ResourceMatcher`'s
//! `capabilities_cache: RwLock<FxHashMap<...>>` TTL-cache shape and
//! `arvak-sched::scheduler::Scheduler::start_background_processor`'s
//! `tokio::spawn` + `interval` pattern. That pattern's `// TODO: Accept a
//! CancellationToken for graceful shutdown` is resolved here with a
//! `tokio::sync::watch` stop channel joined within the bounded grace
//! period §5 requires (5s).
//!
//! Simulated jitter is one admissible deterministic-bounded-jitter
//! scheme among several §9 explicitly sanctions: a signed delta derived
//! from `hash(name, current-minute)`, in `[-0.05, 0.05]`, added to the
//! previous utilization and clamped to `[0, 1]`.

use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHasher};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Default wake interval for a `QueueDynamicsMonitor` spawned by the
/// Dispatch Core when none is configured explicitly.
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(60);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct Entry {
    utilization: f64,
    refreshed_at: Instant,
}

/// Per-resource queue-utilization cache, TTL-bounded and lock-serialized
/// (§4.3, §5's "Selector-local cache lock").
pub struct QueueDynamicsCache {
    ttl: Duration,
    entries: Mutex<FxHashMap<String, Entry>>,
}

impl QueueDynamicsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// Seed an initial value (e.g. from `DREAMER config`'s `queue_dynamics`
    /// map) without requiring a background refresh first.
    pub fn seed(&self, name: &str, utilization: f64) {
        self.set(name, utilization);
    }

    pub fn set(&self, name: &str, utilization: f64) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            name.to_string(),
            Entry {
                utilization: utilization.clamp(0.0, 1.0),
                refreshed_at: Instant::now(),
            },
        );
    }

    /// Fresh utilization for `name`, or `None` if absent or past its TTL
    /// (the Selector treats a miss as utilization 0, per §4.3).
    pub fn get(&self, name: &str) -> Option<f64> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(name)?;
        if entry.refreshed_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.utilization)
    }

    fn refresh_all(&self, names: &[String], minute: i64) {
        let deltas: Vec<(String, f64)> = names
            .iter()
            .map(|name| {
                let previous = self.get(name).unwrap_or(0.0);
                (name.clone(), (previous + jitter(name, minute)).clamp(0.0, 1.0))
            })
            .collect();
        for (name, utilization) in deltas {
            self.set(&name, utilization);
        }
    }
}

fn jitter(name: &str, minute: i64) -> f64 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    minute.hash(&mut hasher);
    ((hasher.finish() % 101) as f64 - 50.0) / 1000.0
}

fn current_minute() -> i64 {
    chrono::Utc::now().timestamp() / 60
}

/// A running background monitor; dropping the handle does not stop the
/// task — call `stop` to tear it down cleanly within the bounded grace
/// period (§5).
pub struct QueueDynamicsMonitor {
    handle: JoinHandle<()>,
    stop_tx: watch::Sender<bool>,
}

impl QueueDynamicsMonitor {
    /// Spawn the monitor: wakes every `interval`, refreshing every name in
    /// `resource_names` with simulated jitter.
    pub fn spawn(cache: std::sync::Arc<QueueDynamicsCache>, resource_names: Vec<String>, interval: Duration) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cache.refresh_all(&resource_names, current_minute());
                    }
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { handle, stop_tx }
    }

    /// Signal the monitor to stop and join it within the 5s grace period.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, self.handle).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_returns_none() {
        let cache = QueueDynamicsCache::with_default_ttl();
        assert_eq!(cache.get("qpu1"), None);
    }

    #[test]
    fn seeded_value_is_clamped_and_readable() {
        let cache = QueueDynamicsCache::with_default_ttl();
        cache.seed("qpu1", 1.5);
        assert_eq!(cache.get("qpu1"), Some(1.0));
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache = QueueDynamicsCache::new(Duration::from_millis(1));
        cache.seed("qpu1", 0.4);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get("qpu1"), None);
    }

    #[test]
    fn jitter_is_deterministic_for_the_same_name_and_minute() {
        assert_eq!(jitter("qpu1", 42), jitter("qpu1", 42));
    }

    #[tokio::test(start_paused = true)]
    async fn monitor_stops_within_grace_period() {
        let cache = std::sync::Arc::new(QueueDynamicsCache::with_default_ttl());
        cache.seed("qpu1", 0.2);
        let monitor = QueueDynamicsMonitor::spawn(cache.clone(), vec!["qpu1".to_string()], Duration::from_secs(60));
        monitor.stop().await;
        assert!(cache.get("qpu1").is_some());
    }
}
