//! The Worker Executor Shim: the remote-invoked function that selects a
//! quantum resource and executes a circuit on a worker process (§4.5).

pub mod error;
pub mod shim;
pub mod singleton;

pub use error::{WorkerError, WorkerResult};
pub use shim::{quantum_execution_remote, ExecutionOutcome};
