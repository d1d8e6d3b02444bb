//! Index construction and lookup
//!
//! `IndexBuilder` turns a raw record set into an immutable `Index`; the
//! containment structure backs position-based resolution for the call graph.

mod builder;
mod containment;
mod diagnostics;
#[allow(clippy::module_inception)]
mod index;

pub use builder::IndexBuilder;
pub use containment::{ContainmentEntry, ContainmentIndex};
pub use diagnostics::{BuildDiagnostics, DuplicateDefinition};
pub use index::Index;
