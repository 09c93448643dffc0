//! Executor Registry: a uniform capability interface over quantum-backend
//! families, plus the closed registry that creates them by name (§4.4).

pub mod error;
pub mod executor;
pub mod registry;
pub mod result;

pub use error::{HalError, HalResult};
pub use executor::{counts_result, Executor, ExecutorFactory};
pub use registry::ExecutorRegistry;
pub use result::{BackendStatus, ExecutionResult};
