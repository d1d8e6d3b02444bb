//! scip-index: in-memory code-intelligence index and derived graphs
//!
//! Turns a serialized record set (symbols, definitions, occurrences across
//! source files) into an immutable index with exact and filtered lookup,
//! plus derived relationship graphs computed from it.
//!
//! Pipeline:
//! - `loader` — deserializes a payload into a [`RawRecordSet`]
//! - `features::index` — single-pass build into an immutable [`Index`]
//! - `features::query` — composable filter chains and projections
//! - `features::graphs` — call / dependency / inheritance graphs
//! - `features::cache` — compute-once memoization keyed by index identity
//! - `features::enrich` — pluggable supplemental fields
//! - `symbol` — the symbol string grammar
//!
//! The index is built by one thread, then read from any number of threads
//! without coordination; it is rebuilt from records on each load and never
//! persisted.
//!
//! ```
//! use scip_index::{CallNode, IndexBuilder, RawRecordSet, SymbolKind, SymbolQuery};
//!
//! let records = RawRecordSet::from_json_slice(br#"{
//!     "documents": [{
//!         "relative_path": "main.py",
//!         "language": "python",
//!         "occurrences": [
//!             {"symbol": "s m p 1 main/f().", "range": [0, 4, 3, 0], "symbol_roles": 1},
//!             {"symbol": "s m p 1 main/g().", "range": [1, 4, 1, 5]},
//!             {"symbol": "s m p 1 main/g().", "range": [5, 4, 7, 0], "symbol_roles": 1}
//!         ],
//!         "symbols": [
//!             {"symbol": "s m p 1 main/f().", "display_name": "f", "kind": "Function"},
//!             {"symbol": "s m p 1 main/g().", "display_name": "g", "kind": "Function"}
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let index = IndexBuilder::build(records);
//! let functions = SymbolQuery::new(&index).by_kind(SymbolKind::Function).execute();
//! assert_eq!(functions.len(), 2);
//!
//! let calls = scip_index::CallGraph::build(&index);
//! assert_eq!(
//!     calls.edge_weight(
//!         &CallNode::symbol("s m p 1 main/f()."),
//!         &CallNode::symbol("s m p 1 main/g().")
//!     ),
//!     Some(1)
//! );
//! ```

pub mod errors;
pub mod features;
pub mod loader;
pub mod shared;
pub mod symbol;

pub use errors::{Result, ScipIndexError};
pub use features::cache::{Analyses, CacheKey, DerivedCache};
pub use features::enrich::{
    EnricherRegistry, FileSystemSourceProvider, SourceProvider, SupplementalFields, SymbolEnricher,
};
pub use features::graphs::{
    CallGraph, CallNode, CycleDetected, DependencyGraph, Diamond, InheritanceDepth,
    InheritanceEdge, InheritanceGraph, StabilityMetrics,
};
pub use features::index::{
    BuildDiagnostics, ContainmentEntry, ContainmentIndex, DuplicateDefinition, Index, IndexBuilder,
};
pub use features::query::{
    CallSite, CallSiteLocator, IndexStatistics, SymbolQuery, SymbolRecord, SymbolSearcher,
};
pub use loader::RawRecordSet;
pub use shared::models::{
    Document, Occurrence, Position, Range, Relationship, SymbolInformation, SymbolKind, SymbolRole,
    SymbolRoles,
};
