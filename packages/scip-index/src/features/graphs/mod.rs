//! Derived relationship graphs
//!
//! Call, dependency, and inheritance graphs, each computed from the index
//! into petgraph adjacency lists addressed by stable identifiers. All three
//! may be cyclic; cycle detection is a queryable property, never an error.

mod call_graph;
mod dependency_graph;
mod inheritance_graph;

pub use call_graph::{CallGraph, CallNode};
pub use dependency_graph::{CycleDetected, DependencyGraph, StabilityMetrics};
pub use inheritance_graph::{Diamond, InheritanceDepth, InheritanceEdge, InheritanceGraph};
