//! `QuantumResource`: an immutable record describing one quantum backend
//! in a Selector's catalogue (§3).

use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::gate::normalize_gate_name;

/// Immutable after construction. `error_rate` of `None` means "unknown" —
/// for `fidelity()` that is treated as 0 (full fidelity). The
/// least-error-rate simple strategy treats `None` differently (as +infinity,
/// i.e. worst); that's a strategy-local interpretation, not a property of
/// the resource itself, and lives in `qpilot-dreamer`.
#[derive(Debug, Clone)]
pub struct QuantumResource {
    pub name: String,
    pub qubit_count: u32,
    pub gate_set: FxHashSet<String>,
    pub error_rate: Option<f64>,
    pub noise_level: f64,
    pub quantum_config: Value,
    pub origin_pilot: Option<String>,
}

impl QuantumResource {
    pub fn new(
        name: impl Into<String>,
        qubit_count: u32,
        gate_set: impl IntoIterator<Item = String>,
        error_rate: Option<f64>,
        noise_level: f64,
        quantum_config: Value,
    ) -> Self {
        Self {
            name: name.into(),
            qubit_count,
            gate_set: gate_set.into_iter().map(|g| normalize_gate_name(&g)).collect(),
            error_rate,
            noise_level,
            quantum_config,
            origin_pilot: None,
        }
    }

    pub fn with_origin_pilot(mut self, pilot: impl Into<String>) -> Self {
        self.origin_pilot = Some(pilot.into());
        self
    }

    /// `1 - error_rate`, treating an unknown error rate as 0.
    pub fn fidelity(&self) -> f64 {
        1.0 - self.error_rate.unwrap_or(0.0)
    }

    /// Resource satisfies §3 invariant 5 for `task`: enough qubits, and its
    /// gate set is a superset of the task's (both normalized).
    pub fn is_suitable_for(&self, num_qubits: u32, gate_set: &FxHashSet<String>) -> bool {
        self.qubit_count >= num_qubits && gate_set.is_subset(&self.gate_set)
    }

    /// Return a copy of this resource with its name prefixed by
    /// `origin_pilot`, guaranteeing catalogue-wide uniqueness across pilots
    /// per §3 invariant 1.
    pub fn namespaced(&self, pilot: &str) -> Self {
        let mut namespaced = self.clone();
        namespaced.name = format!("{pilot}_{}", self.name);
        namespaced.origin_pilot = Some(pilot.to_string());
        namespaced
    }
}
