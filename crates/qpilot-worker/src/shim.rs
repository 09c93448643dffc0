//! The Worker Executor Shim (§4.5): runs on a worker process, selects a
//! resource, executes the circuit, and records exactly one metrics row.
//!
//! Grounded on `worker_qdreamer.py::quantum_execution_remote`: generate a
//! correlation id, build/reuse the cached Selector, select, execute,
//! finalize metrics under a lock, return the result. The try/except that
//! wraps selection-and-execution there becomes a single `match` here so
//! every exit path still reaches the metrics write (§4.5 step 7's "a
//! scoped finalizer guarantees the write", mirrored from §4.1's identical
//! requirement for classical tasks).

use std::sync::Arc;
use std::time::Instant;

use qpilot_dreamer::{Catalogue, QueueDynamicsCache, SelectorKind};
use qpilot_hal::{Executor, ExecutorRegistry};
use qpilot_metrics::MetricsRecorder;
use qpilot_types::{QuantumTask, TaskStatus};
use serde_json::{Map, Value};

use crate::error::WorkerError;
use crate::singleton;

/// The worker-side outcome of one quantum task invocation: either the raw
/// execution result, or the error that was recorded to the metrics row.
pub type ExecutionOutcome = Result<qpilot_hal::ExecutionResult, WorkerError>;

/// Run one quantum task to completion on this worker (§4.5).
///
/// `catalogue` is only consulted the first time this worker sees
/// `selector_kind`; subsequent calls reuse the cached Selector (§4.5 step
/// 3). `metrics` is the shared recorder for this worker process.
/// `queue_dynamics`, when present, is attached to a freshly-built scoring
/// Selector so `balanced`/`high_speed` modes see real queue utilization
/// (§4.3) instead of treating every resource as idle.
pub fn quantum_execution_remote(
    metrics: &MetricsRecorder,
    registry: &ExecutorRegistry,
    selector_kind: SelectorKind,
    catalogue: impl FnOnce() -> Catalogue,
    queue_dynamics: Option<Arc<QueueDynamicsCache>>,
    task: &QuantumTask,
    options: &Map<String, Value>,
) -> ExecutionOutcome {
    let task_id = format!("quantum-{}", uuid::Uuid::new_v4());
    let builder = qpilot_types::TaskMetricsBuilder::new(&task_id);
    tracing::info!(task_id = %task_id, "starting quantum task execution");

    let started = Instant::now();
    let selector = singleton::get_or_create(selector_kind, catalogue, queue_dynamics);

    let selected = selector.select(task).map(|r| (r.name.clone(), r.quantum_config.clone()));

    let (pilot_scheduled, outcome) = match selected {
        None => ("unknown".to_string(), Err(WorkerError::NoSuitableResource)),
        Some((resource_name, quantum_config)) => {
            tracing::info!(task_id = %task_id, resource = %resource_name, "selected quantum resource");
            let family = registry.derive_family(&resource_name);
            let result = match registry.create(&family, &quantum_config) {
                Ok(executor) => executor.execute(&task.circuits, options).map_err(WorkerError::from),
                Err(e) => Err(WorkerError::from(e)),
            };
            (resource_name, result)
        }
    };
    let execution_secs = started.elapsed().as_secs_f64();

    let row = match &outcome {
        Ok(_) => builder
            .with_pilot_scheduled(pilot_scheduled)
            .finalize(TaskStatus::Success, execution_secs, None),
        Err(e) => builder
            .with_pilot_scheduled(pilot_scheduled)
            .finalize(TaskStatus::Failed, execution_secs, Some(e.to_string())),
    };

    if let Err(e) = metrics.append(&row) {
        tracing::error!(task_id = %task_id, error = %e, "failed to append task metrics row");
    }

    tracing::info!(task_id = %task_id, status = ?row.status, execution_secs, "quantum task finished");
    outcome
}
