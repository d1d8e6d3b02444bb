//! Index statistics
//!
//! Field names are part of the external contract.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::features::index::Index;

/// Summary statistics for an index
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexStatistics {
    pub total_documents: usize,
    pub total_symbols: usize,
    pub total_occurrences: usize,

    /// Documents per language tag
    pub language_distribution: BTreeMap<String, usize>,

    /// Declared symbols per kind name
    pub kind_distribution: BTreeMap<String, usize>,
}

impl IndexStatistics {
    pub fn compute(index: &Index) -> Self {
        let mut language_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut kind_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_occurrences = 0;

        for document in index.documents() {
            *language_distribution
                .entry(document.language.clone())
                .or_default() += 1;
            total_occurrences += document.occurrences.len();
        }

        for symbol in index.symbol_order() {
            if let Some(info) = index.symbol_info(symbol) {
                *kind_distribution
                    .entry(info.kind.as_str().to_string())
                    .or_default() += 1;
            }
        }

        Self {
            total_documents: index.document_count(),
            total_symbols: index.symbol_count(),
            total_occurrences,
            language_distribution,
            kind_distribution,
        }
    }
}
