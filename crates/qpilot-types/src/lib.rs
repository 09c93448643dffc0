//! Shared data model for the qpilot heterogeneous compute dispatch service.
//!
//! Every other crate in the workspace depends on this one for the task,
//! resource, pilot, and metrics shapes that cross crate boundaries.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod pilot;
pub mod resource;
pub mod task;

pub use circuit::{Circuit, CircuitEdge, CircuitGraph};
pub use error::TypesError;
pub use gate::normalize_gate_name;
pub use metrics::{TaskMetrics, TaskMetricsBuilder, TaskStatus};
pub use pilot::{PilotDescription, PilotJob, PilotState, QuantumPilotConfig};
pub use resource::QuantumResource;
pub use task::{QuantumTask, ResourceHints, TaskId, TaskKind, TaskSpec};
