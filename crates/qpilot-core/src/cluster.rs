//! The Cluster-Manager Interface (§4.1, §6): the abstraction over the
//! `dask`/`ray`-family backend that actually runs work on worker
//! processes.
//!
//! Grounded on `arvak-sched::broker::{MessageBroker, InMemoryBroker}`: a
//! small `#[async_trait]` trait plus an in-process implementation backed
//! by channels/tasks instead of a real network broker, used the same way
//! here for both production shape and test double. Submitting a classical
//! closure to a real dask/ray cluster would serialize and ship it to a
//! remote process; `LocalClusterManager` runs it on this process's
//! blocking-task pool instead, which is the same contract from the
//! Dispatch Core's point of view (a `TaskFuture` that resolves
//! independently of the submitting call).

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use qpilot_types::ResourceHints;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::error::{DispatchError, DispatchResult};

/// A unit of classical work: boxed so it can cross the (real or
/// simulated) process boundary to a worker. MPI submissions are
/// expressed as a `ClassicalWork` too — `submit_mpi` is "a
/// specialization" of classical (§4.1), not a separate cluster-level
/// concept.
pub type ClassicalWork = Box<dyn FnOnce() -> Result<Value, String> + Send + 'static>;

/// What a `TaskFuture` resolves to once its worker-side closure returns.
#[derive(Debug)]
pub struct TaskOutcome {
    pub task_id: String,
    pub result: Result<Value, String>,
}

/// A handle to one in-flight submission. Resolves independently of the
/// submitting call, per §4.1's "returns immediately" contract.
pub struct TaskFuture {
    task_id: String,
    handle: JoinHandle<TaskOutcome>,
}

impl TaskFuture {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl Future for TaskFuture {
    type Output = Result<TaskOutcome, tokio::task::JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> std::task::Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.handle).poll(cx)
    }
}

/// The backend that actually schedules work onto worker processes.
/// Implementations may target a real dask/ray cluster; `LocalClusterManager`
/// is the in-process test double used by this crate's own tests.
#[async_trait]
pub trait ClusterManager: Send + Sync {
    /// Schedule `work` to run on a worker. When `pool_tag` is set and this
    /// backend supports worker-named routing, restrict the submission to
    /// workers whose names start with `pool_tag` (§4.1 "Routing"). When
    /// the backend is resource-targeted, `resources` is passed through
    /// verbatim.
    async fn spawn(
        &self,
        task_id: String,
        pool_tag: Option<String>,
        resources: ResourceHints,
        work: ClassicalWork,
    ) -> DispatchResult<TaskFuture>;

    /// Names of workers currently known to this cluster client, used for
    /// `pool-tag` prefix routing. Empty if the backend doesn't expose a
    /// roster.
    fn roster(&self) -> Vec<String>;

    /// Tear down the cluster client. Terminal: no further `spawn` calls
    /// are expected to succeed afterward (§5 "Cancellation").
    async fn shutdown(&self);
}

/// In-process `ClusterManager`: runs every submission on Tokio's blocking
/// thread pool. Supports `pool_tag` routing against a fixed worker
/// roster so routing behavior is exercisable without a real cluster.
pub struct LocalClusterManager {
    workers: Vec<String>,
}

impl LocalClusterManager {
    pub fn new(workers: Vec<String>) -> Self {
        Self { workers }
    }

    /// A single-worker roster named `worker-0`, useful for tests and
    /// small local runs that don't exercise pool-tag routing.
    pub fn single_worker() -> Self {
        Self::new(vec!["worker-0".to_string()])
    }
}

#[async_trait]
impl ClusterManager for LocalClusterManager {
    async fn spawn(
        &self,
        task_id: String,
        pool_tag: Option<String>,
        _resources: ResourceHints,
        work: ClassicalWork,
    ) -> DispatchResult<TaskFuture> {
        if let Some(tag) = &pool_tag {
            if !self.workers.iter().any(|w| w.starts_with(tag.as_str())) {
                return Err(DispatchError::SubmitError(format!(
                    "no worker in roster matches pool-tag '{tag}'"
                )));
            }
        }

        let handle_task_id = task_id.clone();
        let handle = tokio::task::spawn_blocking(move || TaskOutcome {
            task_id: handle_task_id,
            result: work(),
        });

        Ok(TaskFuture { task_id, handle })
    }

    fn roster(&self) -> Vec<String> {
        self.workers.clone()
    }

    async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_without_pool_tag_always_succeeds() {
        let cluster = LocalClusterManager::single_worker();
        let future = cluster
            .spawn("t1".into(), None, ResourceHints::default(), Box::new(|| Ok(Value::from(1))))
            .await
            .unwrap();
        let outcome = future.await.unwrap();
        assert_eq!(outcome.result.unwrap(), Value::from(1));
    }

    #[tokio::test]
    async fn pool_tag_restricts_to_matching_workers() {
        let cluster = LocalClusterManager::new(vec!["gpu-0".to_string(), "gpu-1".to_string()]);
        let ok = cluster
            .spawn("t1".into(), Some("gpu".into()), ResourceHints::default(), Box::new(|| Ok(Value::Null)))
            .await;
        assert!(ok.is_ok());

        let err = cluster
            .spawn("t2".into(), Some("cpu".into()), ResourceHints::default(), Box::new(|| Ok(Value::Null)))
            .await;
        assert!(matches!(err, Err(DispatchError::SubmitError(_))));
    }

    #[tokio::test]
    async fn worker_panic_surfaces_as_a_join_error() {
        let cluster = LocalClusterManager::single_worker();
        let future = cluster
            .spawn(
                "t1".into(),
                None,
                ResourceHints::default(),
                Box::new(|| panic!("boom")),
            )
            .await
            .unwrap();
        assert!(future.await.is_err());
    }
}
