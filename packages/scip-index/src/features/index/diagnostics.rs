//! Build diagnostics
//!
//! Structural anomalies in the record set are recorded here instead of
//! failing the build.

/// Duplicate symbol id resolved by last-writer-wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDefinition {
    pub symbol: String,

    /// Document whose definition was kept
    pub kept_path: String,

    /// Document whose definition was overwritten
    pub overwritten_path: String,
}

/// Anomalies observed while building an index
#[derive(Debug, Clone, Default)]
pub struct BuildDiagnostics {
    /// Symbol ids declared by more than one document or more than once
    pub duplicate_definitions: Vec<DuplicateDefinition>,

    /// Occurrences referencing a symbol absent from the symbol table
    pub dangling_references: u64,

    /// Document paths appearing more than once in the record set
    pub duplicate_documents: u64,
}

impl BuildDiagnostics {
    pub fn has_anomalies(&self) -> bool {
        !self.duplicate_definitions.is_empty()
            || self.dangling_references > 0
            || self.duplicate_documents > 0
    }
}
