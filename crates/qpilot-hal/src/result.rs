use std::collections::BTreeMap;

use serde_json::Value;

/// The raw result of an `execute` call. Circuit semantics stay opaque to
/// this crate (§1); we only carry a measurement-counts table, when the
/// adapter produced one, plus whatever the adapter wants to attach as raw
/// detail.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub counts: Option<BTreeMap<String, u64>>,
    pub shots: Option<u32>,
    pub raw: Value,
}

/// Optional detail probe, per §4.4.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    pub name: String,
    pub queue_length: u64,
    pub status: String,
}
