//! Symbol search
//!
//! Name-centric lookups that don't fit the filter chain: free-text search
//! over display names and ids, and prefix autocomplete.

use crate::features::index::Index;
use crate::shared::models::SymbolInformation;

/// Search over an index's declared symbols
pub struct SymbolSearcher<'a> {
    index: &'a Index,
}

impl<'a> SymbolSearcher<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self { index }
    }

    /// Case-insensitive substring search over display names and symbol ids
    pub fn search(&self, query: &str) -> Vec<&'a SymbolInformation> {
        let needle = query.to_lowercase();
        self.declared()
            .filter(|info| {
                info.display_name.to_lowercase().contains(&needle)
                    || info.symbol.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Display-name lookup, exact or substring
    pub fn find_by_name(&self, name: &str, exact: bool) -> Vec<&'a SymbolInformation> {
        self.declared()
            .filter(|info| {
                if exact {
                    info.display_name == name
                } else {
                    info.display_name.contains(name)
                }
            })
            .collect()
    }

    /// Case-insensitive prefix completion, sorted by display name
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<&'a SymbolInformation> {
        let needle = prefix.to_lowercase();
        let mut results: Vec<&SymbolInformation> = self
            .declared()
            .filter(|info| info.display_name.to_lowercase().starts_with(&needle))
            .collect();

        results.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        results.truncate(limit);
        results
    }

    fn declared(&self) -> impl Iterator<Item = &'a SymbolInformation> {
        let index = self.index;
        index
            .symbol_order()
            .iter()
            .filter_map(move |symbol| index.symbol_info(symbol))
    }
}
