//! The Selector (DREAMER): picks one resource per quantum task (§4.3).
//!
//! Grounded on `original_source/pilot/dreamer.py`'s
//! `StrategySelector`/`RoundRobinStrategy`/`LeastErrorRateStrategy`/
//! `LeastBusyStrategy` and the test-referenced `OptimizedResourceSelector`/
//! `Q_DREAMER(config, resources)` scoring constructor
//! (`tests/test_qdreamer_integration.py`). Both historical shapes are
//! unified into one type with two constructors (§9 Open Question,
//! resolved in `DESIGN.md`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use qpilot_types::{QuantumResource, QuantumTask};

use crate::catalogue::Catalogue;
use crate::queue_dynamics::QueueDynamicsCache;
use crate::strategy::{ScoringMode, SelectorKind, SimpleStrategy};

/// Resolves one `QuantumResource` from a catalogue for a given task,
/// applying the suitability filter (§3 invariant 5) before any strategy
/// runs.
pub struct Selector {
    catalogue: Catalogue,
    kind: SelectorKind,
    round_robin_index: AtomicUsize,
    queue_dynamics: Option<Arc<QueueDynamicsCache>>,
}

impl Selector {
    /// Build a scoring-strategy Selector bound to `catalogue` (the
    /// "`Q_DREAMER(config, resources)` scoring constructor" shape).
    pub fn scoring(mode: ScoringMode, catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            kind: SelectorKind::Scoring(mode),
            round_robin_index: AtomicUsize::new(0),
            queue_dynamics: None,
        }
    }

    /// Build a simple-strategy Selector (the `DreamerStrategyType` shape).
    pub fn simple(strategy: SimpleStrategy, catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            kind: SelectorKind::Simple(strategy),
            round_robin_index: AtomicUsize::new(0),
            queue_dynamics: None,
        }
    }

    /// Enable queue-dynamics lookups for the scoring strategies, backed by
    /// a shared cache (so a background `QueueDynamicsMonitor` can keep it
    /// warm independently of selection calls).
    pub fn with_queue_dynamics(mut self, cache: Arc<QueueDynamicsCache>) -> Self {
        self.queue_dynamics = Some(cache);
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Select a resource for `task`, or `None` if no catalogue entry is
    /// suitable (§3 invariant 5; logged as `NoSuitableResource`).
    pub fn select(&self, task: &QuantumTask) -> Option<&QuantumResource> {
        let suitable: Vec<&QuantumResource> = self
            .catalogue
            .values()
            .filter(|r| r.is_suitable_for(task.num_qubits, &task.gate_set))
            .collect();

        if suitable.is_empty() {
            tracing::warn!(task_id = %task.spec.task_id, "NoSuitableResource");
            return None;
        }

        match self.kind {
            SelectorKind::Scoring(mode) => Some(self.pick_by_score(mode, &suitable)),
            SelectorKind::Simple(SimpleStrategy::LeastErrorRate) => Some(self.pick_least_error_rate(&suitable)),
            SelectorKind::Simple(SimpleStrategy::RoundRobin) => Some(self.pick_round_robin(&suitable)),
            SelectorKind::Simple(SimpleStrategy::LeastBusy) => Some(suitable[0]),
        }
    }

    fn queue_utilization(&self, name: &str) -> f64 {
        self.queue_dynamics.as_ref().and_then(|cache| cache.get(name)).unwrap_or(0.0)
    }

    /// Minimize `w_f * (1 - fidelity) + w_q * queue_utilization`, ties
    /// broken by catalogue insertion order (§4.3, §8 law 4).
    fn pick_by_score<'a>(&self, mode: ScoringMode, suitable: &[&'a QuantumResource]) -> &'a QuantumResource {
        let (w_fidelity, w_queue) = mode.weights();
        let mut best = suitable[0];
        let mut best_cost = self.cost(best, w_fidelity, w_queue);
        for &candidate in &suitable[1..] {
            let cost = self.cost(candidate, w_fidelity, w_queue);
            if cost < best_cost {
                best = candidate;
                best_cost = cost;
            }
        }
        best
    }

    fn cost(&self, resource: &QuantumResource, w_fidelity: f64, w_queue: f64) -> f64 {
        let queue_utilization = self.queue_utilization(&resource.name);
        w_fidelity * (1.0 - resource.fidelity()) + w_queue * queue_utilization
    }

    /// `None` error rate is treated as +infinity: never chosen unless it
    /// is the sole suitable resource (§4.3).
    fn pick_least_error_rate<'a>(&self, suitable: &[&'a QuantumResource]) -> &'a QuantumResource {
        suitable
            .iter()
            .copied()
            .min_by(|a, b| {
                let ea = a.error_rate.unwrap_or(f64::INFINITY);
                let eb = b.error_rate.unwrap_or(f64::INFINITY);
                ea.partial_cmp(&eb).unwrap()
            })
            .expect("suitable is non-empty")
    }

    fn pick_round_robin<'a>(&self, suitable: &[&'a QuantumResource]) -> &'a QuantumResource {
        let idx = self.round_robin_index.fetch_add(1, Ordering::Relaxed) % suitable.len();
        suitable[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn resource(name: &str, error_rate: Option<f64>, qubits: u32) -> QuantumResource {
        QuantumResource::new(name, qubits, ["cx".to_string()], error_rate, 0.0, Value::Null)
    }

    fn task(num_qubits: u32) -> QuantumTask {
        QuantumTask::new(vec![qpilot_types::Circuit::Graph(Default::default())], num_qubits, ["cx".to_string()]).unwrap()
    }

    fn catalogue(resources: Vec<QuantumResource>) -> Catalogue {
        resources.into_iter().map(|r| (r.name.clone(), r)).collect()
    }

    /// S4: sole resource too small for the task → no suitable resource.
    #[test]
    fn unsuitable_catalogue_returns_none() {
        let cat = catalogue(vec![resource("a", Some(0.0), 1)]);
        let selector = Selector::simple(SimpleStrategy::LeastErrorRate, cat);
        assert!(selector.select(&task(2)).is_none());
    }

    /// S3: high_fidelity picks B (lower weighted cost) even though A has
    /// much better fidelity, because A's queue utilization dominates.
    #[test]
    fn high_fidelity_scoring_matches_worked_example() {
        let cat = catalogue(vec![resource("a", Some(0.001), 4), resource("b", Some(0.1), 4)]);
        let cache = Arc::new(QueueDynamicsCache::with_default_ttl());
        cache.seed("a", 0.9);
        cache.seed("b", 0.0);
        let selector = Selector::scoring(ScoringMode::HighFidelity, cat).with_queue_dynamics(cache);
        let picked = selector.select(&task(2)).unwrap();
        assert_eq!(picked.name, "b");
    }

    /// S3: under high_speed, B still wins — its zero queue utilization
    /// dominates the (now much larger) queue weight.
    #[test]
    fn high_speed_scoring_prefers_low_queue_utilization() {
        let cat = catalogue(vec![resource("a", Some(0.001), 4), resource("b", Some(0.1), 4)]);
        let cache = Arc::new(QueueDynamicsCache::with_default_ttl());
        cache.seed("a", 0.9);
        cache.seed("b", 0.0);
        let selector = Selector::scoring(ScoringMode::HighSpeed, cat).with_queue_dynamics(cache);
        let picked = selector.select(&task(2)).unwrap();
        assert_eq!(picked.name, "b");
    }

    #[test]
    fn least_error_rate_treats_none_as_worst() {
        let cat = catalogue(vec![resource("unknown", None, 4), resource("known", Some(0.2), 4)]);
        let selector = Selector::simple(SimpleStrategy::LeastErrorRate, cat);
        let picked = selector.select(&task(2)).unwrap();
        assert_eq!(picked.name, "known");
    }

    /// §8 law 5: round robin visits every suitable entry roughly evenly,
    /// in catalogue insertion order.
    #[test]
    fn round_robin_cycles_in_insertion_order() {
        let cat = catalogue(vec![resource("a", None, 4), resource("b", None, 4), resource("c", None, 4)]);
        let selector = Selector::simple(SimpleStrategy::RoundRobin, cat);
        let picks: Vec<String> = (0..6).map(|_| selector.select(&task(2)).unwrap().name.clone()).collect();
        assert_eq!(picks, vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn least_busy_returns_first_suitable_entry() {
        let cat = catalogue(vec![resource("a", Some(0.5), 4), resource("b", Some(0.1), 4)]);
        let selector = Selector::simple(SimpleStrategy::LeastBusy, cat);
        let picked = selector.select(&task(2)).unwrap();
        assert_eq!(picked.name, "a");
    }
}
