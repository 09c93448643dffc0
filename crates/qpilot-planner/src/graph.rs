//! Interaction-graph construction, union-find components, and per-component
//! minimum spanning trees (§4.6 steps 1-4).
//!
//! Grounded on `original_source/pilot/dreamer.py`'s `DSU`/`Edge`/
//! `_build_edges`/`_components`/`_mst`/`_filter_active`. Union-find uses
//! `petgraph::unionfind::UnionFind` (index-based parent pointers) instead
//! of the original's hand-rolled `DSU`, per DESIGN.md.

use std::collections::HashSet;

use petgraph::unionfind::UnionFind;
use qpilot_types::CircuitGraph;

use crate::overhead::gate_overhead;

/// A candidate cut: a two-qubit gate with a known sampling overhead.
#[derive(Debug, Clone)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub gate: String,
    pub theta: Option<f64>,
    pub overhead: f64,
    pub cost: f64,
}

/// Dedup key for a cut, insensitive to endpoint order (§4.6 edge cases).
pub type EdgeKey = (usize, usize, String, Option<u64>);

pub fn edge_key(e: &Edge) -> EdgeKey {
    let (a, b) = if e.u <= e.v { (e.u, e.v) } else { (e.v, e.u) };
    (a, b, e.gate.clone(), e.theta.map(f64::to_bits))
}

/// The node-name/index mapping and the cuttable-edge pool for a circuit.
pub struct InteractionGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
}

impl InteractionGraph {
    /// Build the interaction graph, dropping any two-qubit gate with no
    /// known sampling overhead (unknown gates are not cuttable, §4.6).
    pub fn build(graph: &CircuitGraph) -> Self {
        let nodes = graph.nodes.clone();
        let index_of: std::collections::HashMap<&str, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();

        let edges = graph
            .edges
            .iter()
            .filter_map(|e| {
                let u = *index_of.get(e.u.as_str())?;
                let v = *index_of.get(e.v.as_str())?;
                let overhead = gate_overhead(&e.gate, e.theta)?;
                Some(Edge {
                    u,
                    v,
                    gate: e.gate.to_ascii_lowercase(),
                    theta: e.theta,
                    overhead,
                    cost: overhead.ln(),
                })
            })
            .collect();

        Self { nodes, edges }
    }

    /// Degree of every node under the current edge pool.
    fn degrees(&self) -> Vec<usize> {
        let mut deg = vec![0usize; self.nodes.len()];
        for e in &self.edges {
            deg[e.u] += 1;
            deg[e.v] += 1;
        }
        deg
    }

    /// Node indices with degree > 0 (§4.6 step 2, active-only filter).
    pub fn active_nodes(&self) -> Vec<usize> {
        let deg = self.degrees();
        (0..self.nodes.len()).filter(|&i| deg[i] > 0).collect()
    }

    /// Edges whose both endpoints are in `active`.
    pub fn edges_within(&self, active: &HashSet<usize>) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| active.contains(&e.u) && active.contains(&e.v))
            .cloned()
            .collect()
    }
}

/// Connected components of `working_nodes` under `edges`, as groups of node
/// indices, preserving first-seen order of each component's root.
pub fn components(n: usize, working_nodes: &[usize], edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(n);
    for e in edges {
        uf.union(e.u, e.v);
    }
    let mut order: Vec<usize> = Vec::new();
    let mut groups: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
    for &idx in working_nodes {
        let root = uf.find(idx);
        if !groups.contains_key(&root) {
            order.push(root);
        }
        groups.entry(root).or_default().push(idx);
    }
    order.into_iter().map(|root| groups.remove(&root).unwrap()).collect()
}

/// Minimum spanning tree (by ascending `cost`) of a single component,
/// restricted to edges with both endpoints inside it.
pub fn mst_edges(n: usize, component: &[usize], edges: &[Edge]) -> Vec<Edge> {
    if component.len() < 2 {
        return Vec::new();
    }
    let comp_set: HashSet<usize> = component.iter().copied().collect();
    let mut candidates: Vec<&Edge> = edges
        .iter()
        .filter(|e| comp_set.contains(&e.u) && comp_set.contains(&e.v))
        .collect();
    candidates.sort_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap());

    let mut uf = UnionFind::new(n);
    let mut tree = Vec::new();
    for e in candidates {
        if uf.find(e.u) != uf.find(e.v) {
            uf.union(e.u, e.v);
            tree.push(e.clone());
            if tree.len() == component.len() - 1 {
                break;
            }
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use qpilot_types::CircuitEdge;

    fn graph(edges: Vec<(u32, u32, &str, Option<f64>)>, n: u32) -> CircuitGraph {
        CircuitGraph {
            nodes: (0..n).map(|i| format!("q{i}")).collect(),
            edges: edges
                .into_iter()
                .map(|(u, v, gate, theta)| CircuitEdge {
                    u: format!("q{u}"),
                    v: format!("q{v}"),
                    gate: gate.to_string(),
                    theta,
                })
                .collect(),
        }
    }

    #[test]
    fn unknown_gates_are_dropped() {
        let g = graph(vec![(0, 1, "toffoli", None), (1, 2, "cx", None)], 3);
        let ig = InteractionGraph::build(&g);
        assert_eq!(ig.edges.len(), 1);
        assert_eq!(ig.edges[0].gate, "cx");
    }

    #[test]
    fn active_nodes_excludes_degree_zero() {
        let g = graph(vec![(0, 1, "cx", None)], 3);
        let ig = InteractionGraph::build(&g);
        assert_eq!(ig.active_nodes(), vec![0, 1]);
    }

    #[test]
    fn components_and_mst_agree_on_a_single_triangle() {
        let g = graph(vec![(0, 1, "cx", None), (1, 2, "cz", None), (0, 2, "cy", None)], 3);
        let ig = InteractionGraph::build(&g);
        let comps = components(3, &[0, 1, 2], &ig.edges);
        assert_eq!(comps.len(), 1);
        let tree = mst_edges(3, &comps[0], &ig.edges);
        assert_eq!(tree.len(), 2);
    }
}
