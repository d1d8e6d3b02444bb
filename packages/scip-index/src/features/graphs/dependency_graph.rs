//! Document dependency graph
//!
//! Nodes are document paths. An edge A → B means some import-role
//! occurrence in A resolves to a symbol declared in B. Edges are
//! deduplicated per (A, B) pair with a retained multiplicity count, and a
//! document never depends on itself through this construction. Circular
//! imports are valid: topological ordering is best-effort and reports the
//! blocking cycles instead of failing.

use std::collections::VecDeque;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::features::index::Index;

/// Total ordering is blocked by one or more import cycles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle blocks total ordering ({} cycles)", .cycles.len())]
pub struct CycleDetected {
    /// The strongly connected components forming cycles
    pub cycles: Vec<Vec<String>>,
}

/// Coupling metrics for one document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityMetrics {
    /// Incoming dependencies (documents that depend on this one)
    pub afferent: usize,

    /// Outgoing dependencies
    pub efferent: usize,

    /// efferent / (afferent + efferent); 0.0 for isolated documents
    pub instability: f64,
}

/// Directed document dependency graph with edge multiplicities
pub struct DependencyGraph {
    graph: DiGraph<String, u32>,
    path_to_node: FxHashMap<String, NodeIndex>,
    cycles: Vec<Vec<String>>,
}

impl DependencyGraph {
    /// Build the dependency graph from an index
    pub fn build(index: &Index) -> Self {
        let mut graph = DiGraph::new();
        let mut path_to_node: FxHashMap<String, NodeIndex> = FxHashMap::default();

        for document in index.documents() {
            path_to_node
                .entry(document.relative_path.clone())
                .or_insert_with(|| graph.add_node(document.relative_path.clone()));
        }

        for document in index.documents() {
            let Some(&from_idx) = path_to_node.get(&document.relative_path) else {
                continue;
            };

            for occ in &document.occurrences {
                if !occ.roles.is_import() {
                    continue;
                }

                let Some(target) = index.defining_document(&occ.symbol) else {
                    continue;
                };
                if target.relative_path == document.relative_path {
                    continue;
                }

                let Some(&to_idx) = path_to_node.get(&target.relative_path) else {
                    continue;
                };

                match graph.find_edge(from_idx, to_idx) {
                    Some(edge) => {
                        if let Some(weight) = graph.edge_weight_mut(edge) {
                            *weight += 1;
                        }
                    }
                    None => {
                        graph.add_edge(from_idx, to_idx, 1);
                    }
                }
            }
        }

        let cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|idx| graph[idx].clone()).collect())
            .collect();

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = cycles.len(),
            "dependency graph built"
        );

        Self {
            graph,
            path_to_node,
            cycles,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Documents this document imports from
    pub fn dependencies(&self, path: &str) -> Vec<String> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Documents importing from this one (reverse lookup)
    pub fn dependents(&self, path: &str) -> Vec<String> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<String> {
        if let Some(&idx) = self.path_to_node.get(path) {
            self.graph
                .neighbors_directed(idx, direction)
                .map(|idx| self.graph[idx].clone())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Number of resolved imports behind the (from, to) edge
    pub fn multiplicity(&self, from: &str, to: &str) -> Option<u32> {
        let from_idx = *self.path_to_node.get(from)?;
        let to_idx = *self.path_to_node.get(to)?;
        let edge = self.graph.find_edge(from_idx, to_idx)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Detected import cycles
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Topological order, dependencies first (Kahn's algorithm).
    ///
    /// Errs with the blocking cycles when the graph is cyclic; no edge is
    /// dropped to force an answer.
    pub fn topological_order(&self) -> Result<Vec<String>, CycleDetected> {
        let mut in_degree: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        for idx in self.graph.node_indices() {
            in_degree.insert(idx, 0);
        }
        for edge in self.graph.edge_references() {
            *in_degree.entry(edge.target()).or_insert(0) += 1;
        }

        let mut queue: VecDeque<NodeIndex> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&idx, _)| idx)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());

        while let Some(idx) = queue.pop_front() {
            order.push(self.graph[idx].clone());

            for neighbor in self.graph.neighbors(idx) {
                if let Some(degree) = in_degree.get_mut(&neighbor) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        if order.len() < self.graph.node_count() {
            return Err(CycleDetected {
                cycles: self.cycles.clone(),
            });
        }

        // Kahn emits dependents first; base documents belong up front
        order.reverse();
        Ok(order)
    }

    /// Documents that transitively depend on this one
    pub fn transitive_dependents(&self, path: &str) -> Vec<String> {
        self.closure(path, Direction::Incoming)
    }

    /// Documents this one transitively depends on
    pub fn transitive_dependencies(&self, path: &str) -> Vec<String> {
        self.closure(path, Direction::Outgoing)
    }

    fn closure(&self, path: &str, direction: Direction) -> Vec<String> {
        let Some(&start) = self.path_to_node.get(path) else {
            return Vec::new();
        };

        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.graph.neighbors_directed(current, direction) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Layered view: layer 0 holds documents with no remaining
    /// dependencies, each next layer depends only on earlier ones. When a
    /// cycle blocks further peeling, the remaining documents land in one
    /// final layer.
    pub fn layers(&self) -> Vec<Vec<String>> {
        let mut remaining: FxHashSet<NodeIndex> = self.graph.node_indices().collect();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let mut layer: Vec<NodeIndex> = remaining
                .iter()
                .filter(|&&idx| {
                    self.graph
                        .neighbors_directed(idx, Direction::Outgoing)
                        .all(|n| !remaining.contains(&n))
                })
                .copied()
                .collect();

            if layer.is_empty() {
                // Cycle: everything left forms the last layer
                layer = remaining.iter().copied().collect();
                let mut names: Vec<String> =
                    layer.iter().map(|&idx| self.graph[idx].clone()).collect();
                names.sort_unstable();
                layers.push(names);
                break;
            }

            for idx in &layer {
                remaining.remove(idx);
            }

            let mut names: Vec<String> =
                layer.iter().map(|&idx| self.graph[idx].clone()).collect();
            names.sort_unstable();
            layers.push(names);
        }

        layers
    }

    /// Afferent/efferent coupling and instability per document
    pub fn stability_metrics(&self) -> FxHashMap<String, StabilityMetrics> {
        self.graph
            .node_indices()
            .map(|idx| {
                let afferent = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                let efferent = self
                    .graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .count();

                let instability = if afferent + efferent > 0 {
                    efferent as f64 / (afferent + efferent) as f64
                } else {
                    0.0
                };

                (
                    self.graph[idx].clone(),
                    StabilityMetrics {
                        afferent,
                        efferent,
                        instability,
                    },
                )
            })
            .collect()
    }
}
