//! The Metrics Recorder: an append-only CSV sink shared by the Dispatch
//! Core and the Worker Executor Shim (§3, §4.1(d), §4.5(7), §6).

pub mod error;
pub mod recorder;

pub use error::{MetricsError, MetricsResult};
pub use recorder::MetricsRecorder;
