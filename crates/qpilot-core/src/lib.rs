//! The Dispatch Core: the heterogeneous compute dispatch service's public
//! entry point (§4.1, §4.2, §6).

pub mod cluster;
pub mod dispatch;
pub mod dreamer_config;
pub mod error;

pub use cluster::{ClassicalWork, ClusterManager, LocalClusterManager, TaskFuture, TaskOutcome};
pub use dispatch::{DispatchCore, SubmitOptions};
pub use dreamer_config::DreamerConfig;
pub use error::{DispatchError, DispatchResult};
