use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use qpilot_hal::{counts_result, Executor, ExecutorFactory, HalResult};
use qpilot_types::Circuit;
use rustc_hash::{FxHashMap, FxHasher};
use serde_json::{json, Map, Value};

/// An in-process, noiseless simulator backend. Always reports
/// `is_simulator() == true` and an empty queue (§4.4).
pub struct SimulatorExecutor {
    name: String,
}

impl SimulatorExecutor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Executor for SimulatorExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, circuits: &[Circuit], options: &Map<String, Value>) -> HalResult<qpilot_hal::ExecutionResult> {
        let shots = options.get("shots").and_then(Value::as_u64).unwrap_or(1024) as u64;
        let graph = circuits[0].graph();
        let num_qubits = graph.nodes.len().max(1);

        let mut hasher = FxHasher::default();
        num_qubits.hash(&mut hasher);
        for edge in &graph.edges {
            edge.gate.hash(&mut hasher);
            edge.u.hash(&mut hasher);
            edge.v.hash(&mut hasher);
        }
        let digest = hasher.finish();

        let zero_state = "0".repeat(num_qubits);
        let mut one_state = "0".repeat(num_qubits - 1);
        one_state.push('1');

        let ratio = (digest % 1000) as f64 / 1000.0;
        let count_zero = ((shots as f64) * ratio).round() as u64;
        let count_one = shots - count_zero;

        let mut counts = BTreeMap::new();
        counts.insert(zero_state, count_zero);
        counts.insert(one_state, count_one);

        Ok(counts_result(counts, shots as u32, json!({ "backend": self.name })))
    }

    fn available_resources(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("shots".into(), Value::from(100_000));
        map
    }

    fn queue_lengths(&self) -> FxHashMap<String, f64> {
        FxHashMap::default()
    }

    fn is_simulator(&self) -> bool {
        true
    }
}

pub struct SimulatorFactory;

impl ExecutorFactory for SimulatorFactory {
    fn create(&self, config: &Value) -> HalResult<Box<dyn Executor>> {
        let name = config
            .get("backend")
            .and_then(Value::as_str)
            .unwrap_or("aer_simulator")
            .to_string();
        Ok(Box::new(SimulatorExecutor::new(name)))
    }
}
