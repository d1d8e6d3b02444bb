//! Call graph
//!
//! Directed graph over callable symbols. Edge weights count call-shaped
//! occurrences of the callee resolved to the caller's definition range via
//! the containment index. Occurrences outside any callable definition are
//! attributed to a synthetic module-scope node per document rather than
//! dropped. The graph is not assumed acyclic: recursion shows up as
//! self-loops, mutual recursion as larger strongly connected components.

use std::collections::VecDeque;
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

use crate::features::index::Index;

/// Call graph node: a callable symbol or a document's module scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CallNode {
    /// Callable symbol id
    Symbol(String),

    /// Top-level scope of a document, keyed by path
    ModuleScope(String),
}

impl CallNode {
    pub fn symbol(id: impl Into<String>) -> Self {
        CallNode::Symbol(id.into())
    }

    pub fn module_scope(path: impl Into<String>) -> Self {
        CallNode::ModuleScope(path.into())
    }
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallNode::Symbol(id) => write!(f, "{id}"),
            CallNode::ModuleScope(path) => write!(f, "<module {path}>"),
        }
    }
}

/// Directed, weighted call graph
pub struct CallGraph {
    graph: DiGraph<CallNode, u32>,
    node_ids: FxHashMap<CallNode, NodeIndex>,
}

impl CallGraph {
    /// Build the call graph from an index.
    ///
    /// Every declared callable becomes a node even when it never calls nor
    /// is called; module-scope nodes appear only on demand.
    pub fn build(index: &Index) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_ids: FxHashMap::default(),
        };

        for symbol in index.symbol_order() {
            let callable = index
                .symbol_info(symbol)
                .map(|info| info.kind.is_callable())
                .unwrap_or(false);
            if callable {
                graph.ensure_node(CallNode::Symbol(symbol.clone()));
            }
        }

        for document in index.documents() {
            for occ in &document.occurrences {
                if !occ.is_call_shaped() {
                    continue;
                }

                let callee_callable = index
                    .symbol_info(&occ.symbol)
                    .map(|info| info.kind.is_callable())
                    .unwrap_or(false);
                if !callee_callable {
                    continue;
                }

                let caller = match index
                    .enclosing_callable(&document.relative_path, occ.range.start())
                {
                    Some(symbol) => CallNode::Symbol(symbol.to_string()),
                    None => CallNode::ModuleScope(document.relative_path.clone()),
                };

                graph.bump_edge(caller, CallNode::Symbol(occ.symbol.clone()));
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "call graph built"
        );
        graph
    }

    fn ensure_node(&mut self, node: CallNode) -> NodeIndex {
        if let Some(&idx) = self.node_ids.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_ids.insert(node, idx);
        idx
    }

    fn bump_edge(&mut self, from: CallNode, to: CallNode) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge) => {
                if let Some(weight) = self.graph.edge_weight_mut(edge) {
                    *weight += 1;
                }
            }
            None => {
                self.graph.add_edge(from_idx, to_idx, 1);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: &CallNode) -> bool {
        self.node_ids.contains_key(node)
    }

    /// Accumulated weight of the (caller, callee) edge
    pub fn edge_weight(&self, from: &CallNode, to: &CallNode) -> Option<u32> {
        let from_idx = *self.node_ids.get(from)?;
        let to_idx = *self.node_ids.get(to)?;
        let edge = self.graph.find_edge(from_idx, to_idx)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Direct callees with call counts
    pub fn callees(&self, node: &CallNode) -> Vec<(CallNode, u32)> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Direct callers with call counts (reverse lookup)
    pub fn callers(&self, node: &CallNode) -> Vec<(CallNode, u32)> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: &CallNode, direction: Direction) -> Vec<(CallNode, u32)> {
        let Some(&idx) = self.node_ids.get(node) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other].clone(), *edge.weight())
            })
            .collect()
    }

    /// Strongly connected components that form cycles, computed on demand.
    ///
    /// A single node counts only when it carries a self-loop (direct
    /// recursion).
    pub fn cycles(&self) -> Vec<Vec<CallNode>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || scc
                        .first()
                        .map(|&idx| self.graph.find_edge(idx, idx).is_some())
                        .unwrap_or(false)
            })
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }

    /// Shortest call path from one node to another (BFS over edges)
    pub fn call_path(&self, from: &CallNode, to: &CallNode) -> Option<Vec<CallNode>> {
        let start = *self.node_ids.get(from)?;
        let goal = *self.node_ids.get(to)?;

        let mut predecessors: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                let mut path = vec![self.graph[current].clone()];
                let mut cursor = current;
                while let Some(&prev) = predecessors.get(&cursor) {
                    path.push(self.graph[prev].clone());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in self.graph.neighbors(current) {
                if visited.insert(neighbor) {
                    predecessors.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Every node reachable through outgoing call edges
    pub fn transitive_callees(&self, node: &CallNode) -> Vec<CallNode> {
        self.closure(node, Direction::Outgoing)
    }

    /// Every node that can reach this one through call edges
    pub fn transitive_callers(&self, node: &CallNode) -> Vec<CallNode> {
        self.closure(node, Direction::Incoming)
    }

    fn closure(&self, node: &CallNode, direction: Direction) -> Vec<CallNode> {
        let Some(&start) = self.node_ids.get(node) else {
            return Vec::new();
        };

        // The start node joins the closure only when a cycle reaches back
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
}
