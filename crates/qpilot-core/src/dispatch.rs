//! The Dispatch Core (§4.1): submission, routing, and lifecycle for
//! classical, MPI, and quantum tasks.
//!
//! Grounded on `original_source/pilot/pilot_compute_service.py`'s
//! `PilotComputeBase.submit_task`/`submit_quantum_task`/`wait_tasks`/
//! `get_results`/`cancel` and `PilotComputeService.initialize_dreamer`.
//! The Python class wraps a Dask/Ray client directly; here that's the
//! `ClusterManager` seam so the core stays backend-agnostic the way
//! `arvak-sched::scheduler::HpcScheduler` stays agnostic over
//! SLURM/PBS via `BatchAdapter`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use qpilot_dreamer::{Catalogue, QueueDynamicsCache, QueueDynamicsMonitor, ResourceGenerator, SelectorKind, DEFAULT_MONITOR_INTERVAL};
use qpilot_hal::ExecutorRegistry;
use qpilot_metrics::MetricsRecorder;
use qpilot_types::metrics::{TaskMetricsBuilder, TaskStatus};
use qpilot_types::{PilotJob, QuantumTask, ResourceHints};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cluster::{ClassicalWork, ClusterManager, TaskFuture};
use crate::dreamer_config::DreamerConfig;
use crate::error::{DispatchError, DispatchResult};

struct DreamerState {
    catalogue: Catalogue,
    selector_kind: SelectorKind,
    queue_dynamics: Arc<QueueDynamicsCache>,
    monitor: QueueDynamicsMonitor,
}

/// Options accepted by `submit_classical`/`submit_quantum` (§4.1's
/// `kwargs`).
#[derive(Default)]
pub struct SubmitOptions {
    pub pool_tag: Option<String>,
    pub task_name: Option<String>,
    pub resources: ResourceHints,
}

/// The Dispatch Core: owns the pilot registry, the Resource Catalogue
/// (once DREAMER is initialized), and the cluster client. Quantum
/// submissions never run selection here — see `submit_quantum`.
pub struct DispatchCore {
    cluster: Arc<dyn ClusterManager>,
    registry: Arc<ExecutorRegistry>,
    metrics: Arc<MetricsRecorder>,
    pilots: RwLock<Vec<PilotJob>>,
    dreamer: RwLock<Option<DreamerState>>,
}

impl DispatchCore {
    pub fn new(cluster: Arc<dyn ClusterManager>, registry: Arc<ExecutorRegistry>, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            cluster,
            registry,
            metrics,
            pilots: RwLock::new(Vec::new()),
            dreamer: RwLock::new(None),
        }
    }

    pub async fn register_pilot(&self, pilot: PilotJob) {
        self.pilots.write().await.push(pilot);
    }

    /// §4.2: assemble the Resource Catalogue from every registered quantum
    /// pilot and install it for future `submit_quantum` calls.
    ///
    /// Also seeds a `QueueDynamicsCache` from `config.queue_dynamics` and
    /// starts a `QueueDynamicsMonitor` over the catalogue's resource names
    /// (§4.3), so `balanced`/`high_speed` scoring sees real queue
    /// utilization rather than a hard 0. A prior `initialize_dreamer` call
    /// is torn down first via the same 5s graceful-stop `cancel` uses.
    pub async fn initialize_dreamer(&self, config: &DreamerConfig, generator: &dyn ResourceGenerator) -> DispatchResult<()> {
        let pilots = self.pilots.read().await;
        let catalogue = qpilot_dreamer::assemble_catalogue(&pilots, generator)?;
        drop(pilots);

        let queue_dynamics = Arc::new(QueueDynamicsCache::with_default_ttl());
        for (name, utilization) in &config.queue_dynamics {
            queue_dynamics.seed(name, *utilization);
        }

        let resource_names: Vec<String> = catalogue.keys().cloned().collect();
        let monitor = QueueDynamicsMonitor::spawn(queue_dynamics.clone(), resource_names, DEFAULT_MONITOR_INTERVAL);

        let previous = self.dreamer.write().await.replace(DreamerState {
            catalogue,
            selector_kind: SelectorKind::Scoring(config.optimization_mode),
            queue_dynamics,
            monitor,
        });
        if let Some(state) = previous {
            state.monitor.stop().await;
        }
        Ok(())
    }

    /// §4.1 "Classical wrapping": records wait-time, execution time,
    /// success/failure, and always writes one metrics row — even if `f`
    /// panics — before propagating the outcome.
    pub async fn submit_classical<F>(&self, options: SubmitOptions, f: F) -> DispatchResult<TaskFuture>
    where
        F: FnOnce() -> Result<Value, String> + Send + 'static,
    {
        let task_id = Uuid::new_v4().to_string();
        let task_name = options.task_name.clone().unwrap_or_else(|| format!("task-{task_id}"));
        let metrics = self.metrics.clone();
        let submitted_at = Instant::now();
        let builder_task_id = task_id.clone();

        tracing::info!(task_id = %task_id, task_name = %task_name, "submitting classical task");

        let work: ClassicalWork = Box::new(move || {
            let builder = TaskMetricsBuilder::new(&builder_task_id).with_wait_time_secs(submitted_at.elapsed().as_secs_f64());
            let exec_start = Instant::now();

            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
            let execution_secs = exec_start.elapsed().as_secs_f64();

            let result = match outcome {
                Ok(inner) => inner,
                Err(payload) => Err(panic_message(payload)),
            };

            let row = match &result {
                Ok(_) => builder.finalize(TaskStatus::Success, execution_secs, None),
                Err(msg) => builder.finalize(TaskStatus::Failed, execution_secs, Some(msg.clone())),
            };
            if let Err(e) = metrics.append(&row) {
                tracing::error!(task_id = %row.task_id, error = %e, "failed to append task metrics row");
            }

            result
        });

        self.cluster
            .spawn(task_name, options.pool_tag, options.resources, work)
            .await
    }

    /// `srun -n <num_procs> <interpreter> <script> <args…>` — a classical
    /// specialization (§4.1, §6). Non-zero exit is reported as FAILED; exit
    /// code itself is not surfaced.
    pub async fn submit_mpi(
        &self,
        options: SubmitOptions,
        interpreter: impl Into<String>,
        script_path: impl AsRef<Path>,
        num_procs: u32,
        args: Vec<String>,
    ) -> DispatchResult<TaskFuture> {
        let interpreter = interpreter.into();
        let script_path = script_path.as_ref().to_path_buf();

        self.submit_classical(options, move || {
            let output = std::process::Command::new("srun")
                .arg("-n")
                .arg(num_procs.to_string())
                .arg(&interpreter)
                .arg(&script_path)
                .args(&args)
                .output()
                .map_err(|e| e.to_string())?;

            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

            if !output.status.success() {
                return Err(format!("srun exited non-zero: stderr={stderr}"));
            }
            Ok(serde_json::json!({ "stdout": stdout, "stderr": stderr }))
        })
        .await
    }

    /// Quantum submissions never run selection here (§4.1 "Quantum
    /// path"): the task and a read-only catalogue snapshot are shipped to
    /// the Worker Executor Shim, which owns selection and execution.
    pub async fn submit_quantum(&self, options: SubmitOptions, task: QuantumTask) -> DispatchResult<TaskFuture> {
        let dreamer = self.dreamer.read().await;
        let Some(state) = dreamer.as_ref() else {
            return Err(DispatchError::NotInitialized);
        };
        let catalogue_snapshot = state.catalogue.clone();
        let selector_kind = state.selector_kind;
        let queue_dynamics = state.queue_dynamics.clone();
        drop(dreamer);

        let task_id = task.spec.task_id.clone();
        let registry = self.registry.clone();
        let metrics = self.metrics.clone();

        let work: ClassicalWork = Box::new(move || {
            let outcome = qpilot_worker::quantum_execution_remote(
                &metrics,
                &registry,
                selector_kind,
                || catalogue_snapshot,
                Some(queue_dynamics),
                &task,
                &Map::new(),
            );
            outcome
                .map(|r| serde_json::json!({ "counts": r.counts, "shots": r.shots, "raw": r.raw }))
                .map_err(|e| e.to_string())
        });

        self.cluster
            .spawn(task_id, options.pool_tag, options.resources, work)
            .await
    }

    /// Blocks until every future is terminal; per-future errors are
    /// logged, not re-raised (§4.1, §5).
    pub async fn wait_all(&self, futures: Vec<TaskFuture>) {
        for future in futures {
            let task_id = future.task_id().to_string();
            if let Err(e) = future.await {
                tracing::error!(task_id = %task_id, error = %e, "task join failed");
            }
        }
    }

    /// Results in submission order; a failed future's entry is `None`
    /// (§4.1, §5's ordering guarantee).
    pub async fn get_results(&self, futures: Vec<TaskFuture>) -> Vec<Option<Value>> {
        let mut results = Vec::with_capacity(futures.len());
        for future in futures {
            let task_id = future.task_id().to_string();
            match future.await {
                Ok(outcome) => match outcome.result {
                    Ok(value) => results.push(Some(value)),
                    Err(e) => {
                        tracing::warn!(task_id = %task_id, error = %e, "task failed");
                        results.push(None);
                    }
                },
                Err(e) => {
                    tracing::error!(task_id = %task_id, error = %e, "task join failed");
                    results.push(None);
                }
            }
        }
        results
    }

    /// Terminal: tears down every pilot, the cluster client, and — if
    /// DREAMER was initialized — its `QueueDynamicsMonitor`, joined within
    /// the 5s grace period §5 requires (§4.3, §5).
    pub async fn cancel(&self) {
        self.cluster.shutdown().await;
        self.pilots.write().await.clear();
        let previous = self.dreamer.write().await.take();
        if let Some(state) = previous {
            state.monitor.stop().await;
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qpilot_adapter_sim::SimulatorFactory;
    use qpilot_types::{Circuit, PilotDescription, QuantumPilotConfig, QuantumResource};

    struct StubGenerator;
    impl ResourceGenerator for StubGenerator {
        fn resources_for_executor(&self, executor: &str, _config: &QuantumPilotConfig) -> Vec<QuantumResource> {
            vec![QuantumResource::new(executor, 4, ["cx".to_string()], Some(0.01), 0.0, Value::Null)]
        }
    }

    fn quantum_pilot(name: &str) -> PilotJob {
        PilotJob::new(PilotDescription {
            resource: None,
            working_directory: None,
            pilot_type: None,
            number_of_nodes: 1,
            cores_per_node: 1,
            queue: None,
            walltime: None,
            project: None,
            scheduler_script_commands: Vec::new(),
            name: name.to_string(),
            resource_type: Some("quantum".to_string()),
            quantum: Some(QuantumPilotConfig {
                executor: "sim".to_string(),
                devices: Vec::new(),
                backend: None,
                custom_backends: None,
                token: None,
            }),
            dreamer_enabled: true,
        })
    }

    fn core() -> DispatchCore {
        let dir_path = tempfile::tempdir().unwrap().into_path();
        let metrics = Arc::new(MetricsRecorder::new(dir_path.join("metrics.csv")));
        let mut registry = ExecutorRegistry::new();
        registry.register("sim", Box::new(SimulatorFactory));
        DispatchCore::new(
            Arc::new(crate::cluster::LocalClusterManager::single_worker()),
            Arc::new(registry),
            metrics,
        )
    }

    #[tokio::test]
    async fn submit_classical_round_trips_a_successful_result() {
        let dispatch = core();
        let future = dispatch
            .submit_classical(SubmitOptions::default(), || Ok(Value::from(42)))
            .await
            .unwrap();
        let results = dispatch.get_results(vec![future]).await;
        assert_eq!(results, vec![Some(Value::from(42))]);
    }

    #[tokio::test]
    async fn submit_classical_failure_surfaces_as_none() {
        let dispatch = core();
        let future = dispatch
            .submit_classical(SubmitOptions::default(), || Err("boom".to_string()))
            .await
            .unwrap();
        let results = dispatch.get_results(vec![future]).await;
        assert_eq!(results, vec![None]);
    }

    #[tokio::test]
    async fn submit_quantum_before_initialize_dreamer_is_not_initialized() {
        let dispatch = core();
        let task = QuantumTask::new(vec![Circuit::Graph(Default::default())], 2, ["cx".to_string()]).unwrap();
        let err = dispatch.submit_quantum(SubmitOptions::default(), task).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotInitialized));
    }

    #[tokio::test]
    async fn submit_quantum_after_initialization_executes_on_selected_resource() {
        let dispatch = core();
        dispatch.register_pilot(quantum_pilot("pilot1")).await;
        dispatch
            .initialize_dreamer(&DreamerConfig::default(), &StubGenerator)
            .await
            .unwrap();

        let task = QuantumTask::new(vec![Circuit::Graph(Default::default())], 2, ["cx".to_string()]).unwrap();
        let future = dispatch.submit_quantum(SubmitOptions::default(), task).await.unwrap();
        let results = dispatch.get_results(vec![future]).await;
        assert!(results[0].is_some());
    }

    /// §4.1/§5: `get_results` returns entries in submission order,
    /// independent of completion order.
    #[tokio::test]
    async fn get_results_preserves_submission_order() {
        let dispatch = core();
        let fast = dispatch.submit_classical(SubmitOptions::default(), || Ok(Value::from("fast"))).await.unwrap();
        let slow = dispatch
            .submit_classical(SubmitOptions::default(), || {
                std::thread::sleep(std::time::Duration::from_millis(20));
                Ok(Value::from("slow"))
            })
            .await
            .unwrap();
        let results = dispatch.get_results(vec![slow, fast]).await;
        assert_eq!(results, vec![Some(Value::from("slow")), Some(Value::from("fast"))]);
    }

    #[tokio::test]
    async fn cancel_tears_down_pilots_and_dreamer_state() {
        let dispatch = core();
        dispatch.register_pilot(quantum_pilot("pilot1")).await;
        dispatch
            .initialize_dreamer(&DreamerConfig::default(), &StubGenerator)
            .await
            .unwrap();
        dispatch.cancel().await;
        assert!(dispatch.pilots.read().await.is_empty());
        assert!(dispatch.dreamer.read().await.is_none());
    }

    /// §6/§8 law 4: a seeded `queue_dynamics` entry in the DREAMER config
    /// reaches the scoring selector used on the quantum path, not just
    /// `qpilot-dreamer`'s own unit tests.
    #[tokio::test]
    async fn initialize_dreamer_seeds_queue_dynamics_for_the_quantum_path() {
        let dispatch = core();
        dispatch.register_pilot(quantum_pilot("pilot1")).await;

        let config = DreamerConfig {
            optimization_mode: qpilot_dreamer::ScoringMode::HighFidelity,
            queue_dynamics: [("pilot1_sim".to_string(), 0.75)].into_iter().collect(),
        };
        dispatch.initialize_dreamer(&config, &StubGenerator).await.unwrap();

        let dreamer = dispatch.dreamer.read().await;
        let state = dreamer.as_ref().unwrap();
        assert_eq!(state.queue_dynamics.get("pilot1_sim"), Some(0.75));
    }

    /// §5: `cancel` joins the background `QueueDynamicsMonitor` within its
    /// 5s grace period instead of just dropping it — this call must return
    /// well inside that window.
    #[tokio::test]
    async fn cancel_stops_the_queue_dynamics_monitor_within_the_grace_period() {
        let dispatch = core();
        dispatch.register_pilot(quantum_pilot("pilot1")).await;
        dispatch
            .initialize_dreamer(&DreamerConfig::default(), &StubGenerator)
            .await
            .unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), dispatch.cancel())
            .await
            .expect("cancel must join the monitor within its grace period");
        assert!(dispatch.dreamer.read().await.is_none());
    }
}
