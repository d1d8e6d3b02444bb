//! Immutable in-memory index
//!
//! Built once from a raw record set, then shared freely: every lookup table
//! is read-only and all accessors borrow. Updating means building a new
//! index from a new record set.
//!
//! Derived tables reference documents by position, so the index owns each
//! document, symbol, and occurrence exactly once.

use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use super::containment::ContainmentIndex;
use super::diagnostics::BuildDiagnostics;
use crate::features::query::statistics::IndexStatistics;
use crate::shared::models::{Document, Occurrence, Position, SymbolInformation, SymbolKind};

static NEXT_INDEX_ID: AtomicU64 = AtomicU64::new(1);

pub(super) fn next_index_id() -> u64 {
    NEXT_INDEX_ID.fetch_add(1, Ordering::Relaxed)
}

/// Position of a symbol's declaration: document index + slot in its symbol list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SymbolLocation {
    pub(super) doc: usize,
    pub(super) sym: usize,
}

/// Position of an occurrence: document index + slot in its occurrence list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OccurrenceLocation {
    pub(super) doc: usize,
    pub(super) occ: usize,
}

/// Immutable index over a raw record set
#[derive(Debug)]
pub struct Index {
    pub(super) id: u64,
    pub(super) documents: Vec<Document>,
    pub(super) document_ids: FxHashMap<String, usize>,
    pub(super) symbol_table: FxHashMap<String, SymbolLocation>,
    /// Symbol-table insertion order; duplicate ids keep their first position
    pub(super) symbol_order: Vec<String>,
    pub(super) occurrence_table: FxHashMap<String, Vec<OccurrenceLocation>>,
    pub(super) kind_table: FxHashMap<SymbolKind, Vec<String>>,
    pub(super) language_table: FxHashMap<String, Vec<String>>,
    /// Containment structure per document, parallel to `documents`
    pub(super) containment: Vec<ContainmentIndex>,
    pub(super) diagnostics: BuildDiagnostics,
}

impl Index {
    /// Unique identity of this index instance, used for cache keying
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document(&self, path: &str) -> Option<&Document> {
        self.document_ids.get(path).map(|&idx| &self.documents[idx])
    }

    /// Metadata of a symbol, if any document declares it
    pub fn symbol_info(&self, symbol: &str) -> Option<&SymbolInformation> {
        self.symbol_table
            .get(symbol)
            .map(|loc| &self.documents[loc.doc].symbols[loc.sym])
    }

    /// Document declaring a symbol
    pub fn defining_document(&self, symbol: &str) -> Option<&Document> {
        self.symbol_table
            .get(symbol)
            .map(|loc| &self.documents[loc.doc])
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbol_table.contains_key(symbol)
    }

    /// Declared symbol ids in deterministic insertion order
    pub fn symbol_order(&self) -> &[String] {
        &self.symbol_order
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_order.len()
    }

    /// All occurrences of a symbol as (document path, occurrence),
    /// preserving document order
    pub fn occurrences(&self, symbol: &str) -> Vec<(&str, &Occurrence)> {
        self.occurrence_table
            .get(symbol)
            .map(|locations| {
                locations
                    .iter()
                    .map(|loc| {
                        let doc = &self.documents[loc.doc];
                        (doc.relative_path.as_str(), &doc.occurrences[loc.occ])
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First definition-role occurrence of a symbol
    pub fn find_definition(&self, symbol: &str) -> Option<(&str, &Occurrence)> {
        self.occurrences(symbol)
            .into_iter()
            .find(|(_, occ)| occ.is_definition())
    }

    /// All non-definition occurrences of a symbol
    pub fn find_references(&self, symbol: &str) -> Vec<(&str, &Occurrence)> {
        self.occurrences(symbol)
            .into_iter()
            .filter(|(_, occ)| !occ.is_definition())
            .collect()
    }

    /// Symbol ids of a given kind, in declaration order
    pub fn symbols_of_kind(&self, kind: SymbolKind) -> &[String] {
        self.kind_table.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Symbol ids declared in documents of a given language
    pub fn symbols_of_language(&self, language: &str) -> &[String] {
        self.language_table
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Containment structure for one document
    pub fn containment(&self, path: &str) -> Option<&ContainmentIndex> {
        self.document_ids.get(path).map(|&idx| &self.containment[idx])
    }

    /// Innermost enclosing definition at `pos` whose symbol is callable.
    ///
    /// Walks the enclosing chain outward past non-callable scopes (class
    /// bodies, modules declared as symbols); `None` means module scope.
    pub fn enclosing_callable(&self, path: &str, pos: Position) -> Option<&str> {
        let containment = self.containment(path)?;
        containment
            .enclosing_chain_at(pos)
            .into_iter()
            .find_map(|entry| {
                let info = self.symbol_info(&entry.symbol)?;
                if info.kind.is_callable() {
                    Some(entry.symbol.as_str())
                } else {
                    None
                }
            })
    }

    pub fn diagnostics(&self) -> &BuildDiagnostics {
        &self.diagnostics
    }

    /// Summary statistics over documents and declared symbols
    pub fn get_statistics(&self) -> IndexStatistics {
        IndexStatistics::compute(self)
    }
}
