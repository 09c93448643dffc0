//! The uniform capability interface every adapter family implements
//! (§4.4).
//!
//! The teacher's `arvak_hal::Backend` trait is `#[async_trait]`;
//! `spec.md` describes `execute` as running "synchronously", and the only
//! asynchronous seam the spec calls for is the cluster client
//! (`qpilot-core`). `Executor` is therefore a plain, non-async trait —
//! see DESIGN.md for the rationale.

use std::collections::BTreeMap;

use qpilot_types::Circuit;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::error::HalResult;
use crate::result::{BackendStatus, ExecutionResult};

/// A quantum-backend-family adapter: simulator or hardware, behind one
/// interface.
pub trait Executor: Send + Sync {
    fn name(&self) -> &str;

    /// Synchronously run one or more circuits. `circuits` is non-empty;
    /// option keys/values pass through unchanged to the underlying SDK.
    fn execute(&self, circuits: &[Circuit], options: &Map<String, Value>) -> HalResult<ExecutionResult>;

    /// Descriptive record used by the Resource Generator.
    fn available_resources(&self) -> Map<String, Value>;

    /// Adapter-specific backlog signal, normalized to `[0, 1]` per
    /// resource name. Simulator-family adapters return an empty/zero map.
    fn queue_lengths(&self) -> FxHashMap<String, f64>;

    /// Optional detail probe.
    fn backend_status(&self, _name: &str) -> Option<BackendStatus> {
        None
    }

    fn is_simulator(&self) -> bool;
}

/// Constructs an `Executor` from an opaque config map — the resource's
/// `quantum_config`, treated as the source of truth for family-specific
/// options (device string, backend string, token) per §4.4.
pub trait ExecutorFactory: Send + Sync {
    fn create(&self, config: &Value) -> HalResult<Box<dyn Executor>>;
}

/// Helper used by adapters to turn an opaque counts bitstring map into the
/// result shape consumed by the worker shim.
pub fn counts_result(counts: BTreeMap<String, u64>, shots: u32, raw: Value) -> ExecutionResult {
    ExecutionResult {
        counts: Some(counts),
        shots: Some(shots),
        raw,
    }
}
