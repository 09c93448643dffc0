//! Circuit representation: either a structured interaction graph, or an
//! opaque zero-argument builder callable that produces one.
//!
//! §3 describes `circuits` as "an ordered non-empty sequence of opaque
//! circuit objects or zero-argument builder callables". This crate treats
//! circuits as opaque everywhere except the planner, which only needs the
//! qubit-interaction graph — so `Circuit` exposes exactly that and nothing
//! about gate semantics, matching §1's "does not define circuit semantics".

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A two-qubit-gate interaction edge, as consumed by the cut planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitEdge {
    pub u: String,
    pub v: String,
    pub gate: String,
    pub theta: Option<f64>,
}

/// A structured qubit-interaction graph: `{nodes, edges}` per §4.6.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircuitGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<CircuitEdge>,
}

impl CircuitGraph {
    pub fn new(nodes: Vec<String>, edges: Vec<CircuitEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Build the canonical `q0..q_{n-1}` node labeling for `n` qubits, with
    /// one edge per two-qubit gate instruction. Mirrors the normalization
    /// rule in §4.6 for opaque circuit objects exposing an instruction
    /// stream.
    pub fn from_instructions(num_qubits: u32, instructions: &[(String, u32, u32, Option<f64>)]) -> Self {
        let nodes = (0..num_qubits).map(|i| format!("q{i}")).collect();
        let edges = instructions
            .iter()
            .map(|(gate, u, v, theta)| CircuitEdge {
                u: format!("q{u}"),
                v: format!("q{v}"),
                gate: gate.clone(),
                theta: *theta,
            })
            .collect();
        Self { nodes, edges }
    }
}

/// An opaque circuit: a ready-made graph, or a zero-argument builder that
/// produces one lazily (the builder-callable case from §3).
#[derive(Clone)]
pub enum Circuit {
    Graph(CircuitGraph),
    Builder(Arc<dyn Fn() -> CircuitGraph + Send + Sync>),
}

impl Circuit {
    pub fn graph(&self) -> CircuitGraph {
        match self {
            Circuit::Graph(g) => g.clone(),
            Circuit::Builder(f) => f(),
        }
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Circuit::Graph(g) => f.debug_tuple("Circuit::Graph").field(g).finish(),
            Circuit::Builder(_) => f.write_str("Circuit::Builder(..)"),
        }
    }
}

impl From<CircuitGraph> for Circuit {
    fn from(graph: CircuitGraph) -> Self {
        Circuit::Graph(graph)
    }
}
