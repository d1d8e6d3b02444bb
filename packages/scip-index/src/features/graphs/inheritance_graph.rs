//! Type inheritance graph
//!
//! Nodes are class and interface symbols. An edge child → parent exists for
//! each relationship tagged implementation or type-definition, labeled so
//! callers can tell "implements" from "extends". Traversals bound
//! themselves with visited sets: diamonds and even erroneous
//! self-referential hierarchies terminate instead of recursing forever.

use std::collections::VecDeque;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

use crate::features::index::Index;

/// Edge label distinguishing the relationship kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InheritanceEdge {
    /// "implements" / "extends" relationship
    Implements,

    /// Type-definition relationship
    TypeDefinition,
}

impl InheritanceEdge {
    pub fn as_str(&self) -> &'static str {
        match self {
            InheritanceEdge::Implements => "implements",
            InheritanceEdge::TypeDefinition => "type_definition",
        }
    }
}

/// Diamond: a descendant reaching one base through multiple parents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diamond {
    pub descendant: String,
    pub base: String,
}

/// Inheritance depth summary for one type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InheritanceDepth {
    /// Direct parent count
    pub direct_parents: usize,

    /// Longest upward path length
    pub total_depth: usize,

    /// Distinct ancestors
    pub ancestor_count: usize,
}

/// Directed inheritance graph (child → parent)
pub struct InheritanceGraph {
    graph: DiGraph<String, InheritanceEdge>,
    symbol_to_node: FxHashMap<String, NodeIndex>,
}

impl InheritanceGraph {
    /// Build the inheritance graph from an index.
    ///
    /// Relationship targets become nodes even when no document declares
    /// them, so hierarchies rooted in external types stay traversable.
    pub fn build(index: &Index) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            symbol_to_node: FxHashMap::default(),
        };

        for symbol in index.symbol_order() {
            let Some(info) = index.symbol_info(symbol) else {
                continue;
            };
            if !info.kind.is_type_like() {
                continue;
            }

            let child = graph.ensure_node(symbol);

            for relationship in &info.relationships {
                if relationship.is_implementation {
                    let parent = graph.ensure_node(&relationship.symbol);
                    graph
                        .graph
                        .add_edge(child, parent, InheritanceEdge::Implements);
                }
                if relationship.is_type_definition {
                    let parent = graph.ensure_node(&relationship.symbol);
                    graph
                        .graph
                        .add_edge(child, parent, InheritanceEdge::TypeDefinition);
                }
            }
        }

        debug!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "inheritance graph built"
        );
        graph
    }

    fn ensure_node(&mut self, symbol: &str) -> NodeIndex {
        if let Some(&idx) = self.symbol_to_node.get(symbol) {
            return idx;
        }
        let idx = self.graph.add_node(symbol.to_string());
        self.symbol_to_node.insert(symbol.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_node.contains_key(symbol)
    }

    /// Direct parents with edge labels
    pub fn parents(&self, symbol: &str) -> Vec<(String, InheritanceEdge)> {
        self.labeled_neighbors(symbol, Direction::Outgoing)
    }

    /// Direct children with edge labels (reverse lookup)
    pub fn children(&self, symbol: &str) -> Vec<(String, InheritanceEdge)> {
        self.labeled_neighbors(symbol, Direction::Incoming)
    }

    fn labeled_neighbors(
        &self,
        symbol: &str,
        direction: Direction,
    ) -> Vec<(String, InheritanceEdge)> {
        let Some(&idx) = self.symbol_to_node.get(symbol) else {
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

    /// All ancestors (transitive parents), cycle-safe
    pub fn ancestors(&self, symbol: &str) -> Vec<String> {
        self.closure(symbol, Direction::Outgoing)
    }

    /// All descendants (transitive children), cycle-safe
    pub fn descendants(&self, symbol: &str) -> Vec<String> {
        self.closure(symbol, Direction::Incoming)
    }

    fn closure(&self, symbol: &str, direction: Direction) -> Vec<String> {
        let Some(&start) = self.symbol_to_node.get(symbol) else {
            return Vec::new();
        };

        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.graph.neighbors_directed(current, direction) {
                if neighbor != start && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Method resolution order: breadth-first over parents, starting at the
    /// type itself, each ancestor listed once
    pub fn method_resolution_order(&self, symbol: &str) -> Vec<String> {
        let Some(&start) = self.symbol_to_node.get(symbol) else {
            return Vec::new();
        };

        let mut order = Vec::new();
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            order.push(self.graph[current].clone());
            for parent in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }

        order
    }

    /// Nearest common ancestor of two types, by combined upward distance.
    /// A type counts as its own ancestor at distance zero. Ties break on
    /// symbol order for determinism.
    pub fn common_ancestor(&self, first: &str, second: &str) -> Option<String> {
        let first_depths = self.ancestor_depths(first)?;
        let second_depths = self.ancestor_depths(second)?;

        first_depths
            .iter()
            .filter_map(|(idx, d1)| second_depths.get(idx).map(|d2| (idx, d1 + d2)))
            .min_by(|(a_idx, a_cost), (b_idx, b_cost)| {
                a_cost
                    .cmp(b_cost)
                    .then_with(|| self.graph[**a_idx].cmp(&self.graph[**b_idx]))
            })
            .map(|(idx, _)| self.graph[*idx].clone())
    }

    fn ancestor_depths(&self, symbol: &str) -> Option<FxHashMap<NodeIndex, usize>> {
        let &start = self.symbol_to_node.get(symbol)?;

        let mut depths: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut queue = VecDeque::new();

        depths.insert(start, 0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let depth = depths[&current];
            for parent in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if !depths.contains_key(&parent) {
                    depths.insert(parent, depth + 1);
                    queue.push_back(parent);
                }
            }
        }

        Some(depths)
    }

    /// Types inheriting one base through at least two distinct parents
    pub fn find_diamonds(&self) -> Vec<Diamond> {
        let mut diamonds = Vec::new();
        let mut seen: FxHashSet<(String, String)> = FxHashSet::default();

        for idx in self.graph.node_indices() {
            let parents: Vec<NodeIndex> = {
                let mut unique: Vec<NodeIndex> = self
                    .graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .collect();
                unique.sort_unstable();
                unique.dedup();
                unique
            };

            if parents.len() < 2 {
                continue;
            }

            let descendant = &self.graph[idx];
            for (i, &p1) in parents.iter().enumerate() {
                for &p2 in &parents[i + 1..] {
                    let Some(base) =
                        self.common_ancestor(&self.graph[p1], &self.graph[p2])
                    else {
                        continue;
                    };

                    if seen.insert((descendant.clone(), base.clone())) {
                        diamonds.push(Diamond {
                            descendant: descendant.clone(),
                            base,
                        });
                    }
                }
            }
        }

        diamonds
    }

    /// Depth metrics for one type, cycle-safe
    pub fn analyze_depth(&self, symbol: &str) -> InheritanceDepth {
        let Some(&start) = self.symbol_to_node.get(symbol) else {
            return InheritanceDepth {
                direct_parents: 0,
                total_depth: 0,
                ancestor_count: 0,
            };
        };

        let direct_parents = {
            let mut unique: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(start, Direction::Outgoing)
                .collect();
            unique.sort_unstable();
            unique.dedup();
            unique.len()
        };

        // Leveled BFS upward; the visited set caps erroneous cycles
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        visited.insert(start);
        let mut frontier: Vec<NodeIndex> = vec![start];
        let mut total_depth = 0;

        loop {
            let mut next = Vec::new();
            for &idx in &frontier {
                for parent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                    if visited.insert(parent) {
                        next.push(parent);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            total_depth += 1;
            frontier = next;
        }

        InheritanceDepth {
            direct_parents,
            total_depth,
            ancestor_count: visited.len() - 1,
        }
    }
}
