//! `Task`/`QuantumTask`: submission units (§3).
//!
//! §9 replaces the original's runtime `type` attribute with a tagged
//! variant (`TaskKind`) so dispatch code matches exhaustively instead of
//! branching on duck-typed attributes.

use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::circuit::Circuit;
use crate::error::TypesError;
use crate::gate::normalize_gate_name;

pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Classical,
    Mpi,
    Quantum,
}

/// Resource-request hints passed through to the cluster client verbatim.
#[derive(Debug, Clone, Default)]
pub struct ResourceHints {
    pub cpu: Option<u32>,
    pub gpu: Option<u32>,
    pub memory_mb: Option<u64>,
    pub qpu: Option<u32>,
}

/// Fields common to every submission, regardless of kind.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub task_id: TaskId,
    pub task_name: String,
    pub pool_tag: Option<String>,
    pub resources: ResourceHints,
}

impl TaskSpec {
    pub fn new(kind: TaskKind) -> Self {
        let task_id = Uuid::new_v4().to_string();
        Self {
            kind,
            task_name: format!("task-{task_id}"),
            task_id,
            pool_tag: None,
            resources: ResourceHints::default(),
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = task_id.into();
        self
    }

    pub fn with_task_name(mut self, task_name: impl Into<String>) -> Self {
        self.task_name = task_name.into();
        self
    }

    pub fn with_pool_tag(mut self, pool_tag: impl Into<String>) -> Self {
        self.pool_tag = Some(pool_tag.into());
        self
    }

    pub fn with_resources(mut self, resources: ResourceHints) -> Self {
        self.resources = resources;
        self
    }
}

/// A `Task` with `kind = quantum`, plus the circuit payload and the
/// requirements the Selector matches against the catalogue.
#[derive(Debug, Clone)]
pub struct QuantumTask {
    pub spec: TaskSpec,
    pub circuits: Vec<Circuit>,
    pub num_qubits: u32,
    pub gate_set: FxHashSet<String>,
}

impl QuantumTask {
    pub fn new(
        circuits: Vec<Circuit>,
        num_qubits: u32,
        gate_set: impl IntoIterator<Item = String>,
    ) -> Result<Self, TypesError> {
        if circuits.is_empty() {
            return Err(TypesError::EmptyCircuits);
        }
        if num_qubits == 0 {
            return Err(TypesError::InvalidQubitCount);
        }
        Ok(Self {
            spec: TaskSpec::new(TaskKind::Quantum),
            circuits,
            num_qubits,
            gate_set: gate_set.into_iter().map(|g| normalize_gate_name(&g)).collect(),
        })
    }

    pub fn with_spec(mut self, spec: TaskSpec) -> Self {
        self.spec = spec;
        self
    }
}
