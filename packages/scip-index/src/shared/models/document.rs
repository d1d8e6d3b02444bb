//! Document model
//!
//! A document owns its occurrences and the symbols it locally defines.
//! Sequences stay in wire order; index construction depends on that order
//! for deterministic iteration.

use serde::{Deserialize, Serialize};

use super::{Occurrence, SymbolInformation};

/// Source file with its occurrences and locally-defined symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Relative path, unique within an index
    pub relative_path: String,

    /// Language tag (e.g. "python", "typescript")
    pub language: String,

    /// Ordered occurrences
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,

    /// Ordered locally-defined symbols
    #[serde(default)]
    pub symbols: Vec<SymbolInformation>,
}

impl Document {
    pub fn new(relative_path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            language: language.into(),
            occurrences: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn with_occurrences(mut self, occurrences: Vec<Occurrence>) -> Self {
        self.occurrences = occurrences;
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<SymbolInformation>) -> Self {
        self.symbols = symbols;
        self
    }

    /// All occurrences of one symbol, in document order
    pub fn find_occurrences(&self, symbol: &str) -> Vec<&Occurrence> {
        self.occurrences
            .iter()
            .filter(|occ| occ.symbol == symbol)
            .collect()
    }

    /// First definition-role occurrence of a symbol in this document
    pub fn find_definition(&self, symbol: &str) -> Option<&Occurrence> {
        self.occurrences
            .iter()
            .find(|occ| occ.symbol == symbol && occ.is_definition())
    }
}
