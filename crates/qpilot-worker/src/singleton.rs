//! Process-local cached Selector (§4.5 step 3, §5 "double-checked-lazy
//! construction").
//!
//! Grounded on `worker_qdreamer.py`'s `_WORKER_QDREAMER` module global and
//! `_get_or_create_worker_qdreamer`: a lazily-built, process-wide cache
//! that is built once and reused by every subsequent invocation on this
//! worker. The Python global is keyed implicitly by "the first call";
//! here it's keyed explicitly by `SelectorKind` so a worker configured
//! for more than one strategy family still gets one singleton per
//! strategy rather than silently reusing the wrong one — but the
//! catalogue itself still follows "first invocation wins" within a given
//! strategy, exactly as the source does.

use std::sync::{Arc, Mutex, OnceLock};

use qpilot_dreamer::{Catalogue, QueueDynamicsCache, Selector, SelectorKind};
use rustc_hash::FxHashMap;

type SelectorCache = Mutex<FxHashMap<SelectorKind, Arc<Selector>>>;

static WORKER_SELECTORS: OnceLock<SelectorCache> = OnceLock::new();

/// Return this worker's cached Selector for `kind`, constructing it from
/// `catalogue` on first use. Later calls with the same `kind` ignore
/// their `catalogue` argument and reuse the first one installed — this is
/// the deliberate warm-path tradeoff §9 documents.
///
/// `queue_dynamics`, when present, is attached via `with_queue_dynamics`
/// so a scoring Selector's `balanced`/`high_speed` modes see real queue
/// utilization instead of a hard 0. Ignored for simple strategies, which
/// never consult queue utilization.
pub fn get_or_create(
    kind: SelectorKind,
    catalogue: impl FnOnce() -> Catalogue,
    queue_dynamics: Option<Arc<QueueDynamicsCache>>,
) -> Arc<Selector> {
    let cache = WORKER_SELECTORS.get_or_init(|| Mutex::new(FxHashMap::default()));
    let mut guard = cache.lock().unwrap();
    guard
        .entry(kind)
        .or_insert_with(|| {
            let selector = match kind {
                SelectorKind::Scoring(mode) => Selector::scoring(mode, catalogue()),
                SelectorKind::Simple(strategy) => Selector::simple(strategy, catalogue()),
            };
            Arc::new(match queue_dynamics {
                Some(cache) => selector.with_queue_dynamics(cache),
                None => selector,
            })
        })
        .clone()
}
