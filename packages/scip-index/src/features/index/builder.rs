//! Index construction
//!
//! Single pass over the record set. The mutable accumulation state lives
//! only inside the build call; callers only ever see the finalized
//! immutable index.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::containment::ContainmentIndex;
use super::diagnostics::{BuildDiagnostics, DuplicateDefinition};
use super::index::{next_index_id, Index, OccurrenceLocation, SymbolLocation};
use crate::loader::RawRecordSet;
use crate::shared::models::{Document, SymbolKind};

/// Builds an [`Index`] from a raw record set
pub struct IndexBuilder;

impl IndexBuilder {
    /// Consume a record set and produce an immutable index.
    ///
    /// Never fails: duplicate definitions resolve last-writer-wins and
    /// dangling references are counted, both recorded in the diagnostics.
    /// An empty record set yields an index whose queries short-circuit.
    pub fn build(records: RawRecordSet) -> Index {
        let mut state = BuilderState::default();

        for document in records.documents {
            state.add_document(document);
        }

        state.finalize()
    }
}

#[derive(Default)]
struct BuilderState {
    documents: Vec<Document>,
    document_ids: FxHashMap<String, usize>,
    symbol_table: FxHashMap<String, SymbolLocation>,
    symbol_order: Vec<String>,
    occurrence_table: FxHashMap<String, Vec<OccurrenceLocation>>,
    containment: Vec<ContainmentIndex>,
    duplicate_definitions: Vec<DuplicateDefinition>,
    duplicate_documents: u64,
}

impl BuilderState {
    fn add_document(&mut self, document: Document) {
        let doc_idx = self.documents.len();

        debug!(
            path = %document.relative_path,
            occurrences = document.occurrences.len(),
            symbols = document.symbols.len(),
            "indexing document"
        );

        if let Some(previous) = self
            .document_ids
            .insert(document.relative_path.clone(), doc_idx)
        {
            self.duplicate_documents += 1;
            warn!(
                path = %document.relative_path,
                previous_index = previous,
                "duplicate document path, later document shadows earlier"
            );
        }

        for (sym_idx, info) in document.symbols.iter().enumerate() {
            let location = SymbolLocation {
                doc: doc_idx,
                sym: sym_idx,
            };

            if let Some(previous) = self.symbol_table.insert(info.symbol.clone(), location) {
                let overwritten_path = self.documents[previous.doc].relative_path.clone();
                warn!(
                    symbol = %info.symbol,
                    kept = %document.relative_path,
                    overwritten = %overwritten_path,
                    "duplicate symbol definition, last writer wins"
                );
                self.duplicate_definitions.push(DuplicateDefinition {
                    symbol: info.symbol.clone(),
                    kept_path: document.relative_path.clone(),
                    overwritten_path,
                });
                // First insertion keeps its slot in symbol_order
            } else {
                self.symbol_order.push(info.symbol.clone());
            }
        }

        for (occ_idx, occ) in document.occurrences.iter().enumerate() {
            self.occurrence_table
                .entry(occ.symbol.clone())
                .or_default()
                .push(OccurrenceLocation {
                    doc: doc_idx,
                    occ: occ_idx,
                });
        }

        self.containment
            .push(ContainmentIndex::from_occurrences(&document.occurrences));

        self.documents.push(document);
    }

    fn finalize(self) -> Index {
        let BuilderState {
            documents,
            document_ids,
            symbol_table,
            symbol_order,
            occurrence_table,
            containment,
            duplicate_definitions,
            duplicate_documents,
        } = self;

        // Kind and language tables come from the final symbol table, so a
        // duplicate id contributes only its surviving kind and language.
        let mut kind_table: FxHashMap<SymbolKind, Vec<String>> = FxHashMap::default();
        let mut language_table: FxHashMap<String, Vec<String>> = FxHashMap::default();

        for symbol in &symbol_order {
            let location = symbol_table[symbol];
            let document = &documents[location.doc];
            let info = &document.symbols[location.sym];

            kind_table
                .entry(info.kind)
                .or_default()
                .push(symbol.clone());
            language_table
                .entry(document.language.clone())
                .or_default()
                .push(symbol.clone());
        }

        let mut dangling_references = 0u64;
        for (symbol, locations) in &occurrence_table {
            if !symbol_table.contains_key(symbol) {
                dangling_references += locations.len() as u64;
            }
        }
        if dangling_references > 0 {
            warn!(
                count = dangling_references,
                "occurrences reference symbols with no declaration"
            );
        }

        let total_occurrences: usize = documents.iter().map(|d| d.occurrences.len()).sum();
        info!(
            documents = documents.len(),
            symbols = symbol_order.len(),
            occurrences = total_occurrences,
            "index built"
        );

        Index {
            id: next_index_id(),
            documents,
            document_ids,
            symbol_table,
            symbol_order,
            occurrence_table,
            kind_table,
            language_table,
            containment,
            diagnostics: BuildDiagnostics {
                duplicate_definitions,
                dangling_references,
                duplicate_documents,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Occurrence, Range, SymbolInformation, SymbolRoles};

    fn make_document(path: &str, language: &str) -> Document {
        Document::new(path, language)
    }

    fn make_symbol(id: &str, name: &str, kind: SymbolKind) -> SymbolInformation {
        SymbolInformation::new(id, name, kind)
    }

    #[test]
    fn test_build_empty_record_set() {
        let index = IndexBuilder::build(RawRecordSet::default());

        assert!(index.is_empty());
        assert_eq!(index.document_count(), 0);
        assert_eq!(index.symbol_count(), 0);
        assert!(index.occurrences("anything").is_empty());
        assert!(!index.diagnostics().has_anomalies());
    }

    #[test]
    fn test_build_populates_tables() {
        let doc = make_document("src/main.py", "python")
            .with_symbols(vec![
                make_symbol("sym:f", "f", SymbolKind::Function),
                make_symbol("sym:C", "C", SymbolKind::Class),
            ])
            .with_occurrences(vec![
                Occurrence::new("sym:f", Range::new(0, 4, 2, 0), SymbolRoles::definition()),
                Occurrence::new("sym:f", Range::new(5, 0, 5, 1), SymbolRoles::new()),
            ]);

        let index = IndexBuilder::build(RawRecordSet::new(vec![doc]));

        assert_eq!(index.symbol_count(), 2);
        assert_eq!(index.symbol_order(), &["sym:f", "sym:C"]);
        assert_eq!(index.symbol_info("sym:f").unwrap().kind, SymbolKind::Function);
        assert_eq!(index.symbols_of_kind(SymbolKind::Class), &["sym:C"]);
        assert_eq!(
            index.symbols_of_language("python"),
            &["sym:f", "sym:C"]
        );

        let occs = index.occurrences("sym:f");
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].0, "src/main.py");
        assert!(occs[0].1.is_definition());

        let (path, def) = index.find_definition("sym:f").unwrap();
        assert_eq!(path, "src/main.py");
        assert_eq!(def.range.start_line, 0);
    }

    #[test]
    fn test_duplicate_symbol_last_writer_wins() {
        let first = make_document("a.py", "python")
            .with_symbols(vec![make_symbol("sym:x", "x", SymbolKind::Variable)]);
        let second = make_document("b.py", "python")
            .with_symbols(vec![make_symbol("sym:x", "x", SymbolKind::Constant)]);

        let index = IndexBuilder::build(RawRecordSet::new(vec![first, second]));

        // Later declaration wins, order slot stays at first appearance
        assert_eq!(index.symbol_info("sym:x").unwrap().kind, SymbolKind::Constant);
        assert_eq!(index.symbol_order(), &["sym:x"]);
        assert_eq!(index.defining_document("sym:x").unwrap().relative_path, "b.py");

        let dups = &index.diagnostics().duplicate_definitions;
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].kept_path, "b.py");
        assert_eq!(dups[0].overwritten_path, "a.py");

        // Kind table reflects the surviving declaration only
        assert!(index.symbols_of_kind(SymbolKind::Variable).is_empty());
        assert_eq!(index.symbols_of_kind(SymbolKind::Constant), &["sym:x"]);
    }

    #[test]
    fn test_dangling_references_counted_and_retained() {
        let doc = make_document("a.py", "python").with_occurrences(vec![
            Occurrence::new("sym:ghost", Range::new(1, 0, 1, 5), SymbolRoles::new()),
            Occurrence::new("sym:ghost", Range::new(2, 0, 2, 5), SymbolRoles::new()),
        ]);

        let index = IndexBuilder::build(RawRecordSet::new(vec![doc]));

        assert_eq!(index.diagnostics().dangling_references, 2);
        // Occurrences stay queryable despite the missing declaration
        assert_eq!(index.occurrences("sym:ghost").len(), 2);
    }

    #[test]
    fn test_containment_built_per_document() {
        let doc = make_document("a.py", "python").with_occurrences(vec![Occurrence::new(
            "sym:f",
            Range::new(0, 0, 10, 0),
            SymbolRoles::definition(),
        )]);

        let index = IndexBuilder::build(RawRecordSet::new(vec![doc]));

        let containment = index.containment("a.py").unwrap();
        assert_eq!(containment.len(), 1);
        assert!(index.containment("missing.py").is_none());
    }

    #[test]
    fn test_build_is_idempotent() {
        let records = RawRecordSet::new(vec![make_document("a.py", "python")
            .with_symbols(vec![make_symbol("sym:f", "f", SymbolKind::Function)])
            .with_occurrences(vec![Occurrence::new(
                "sym:f",
                Range::new(0, 0, 3, 0),
                SymbolRoles::definition(),
            )])]);

        let first = IndexBuilder::build(records.clone());
        let second = IndexBuilder::build(records);

        assert_eq!(first.symbol_order(), second.symbol_order());
        assert_eq!(first.get_statistics(), second.get_statistics());
        // Identities differ even for identical inputs
        assert_ne!(first.id(), second.id());
    }
}
