//! Composable symbol queries
//!
//! A query wraps an index and an accumulated filter chain. Refinements are
//! side-effect free: each returns a new handle ANDing one more predicate,
//! so handles clone cheaply and share across threads. Execution walks the
//! symbol table in insertion order, which keeps results deterministic and
//! makes any ordering of the same refinements produce the same sequence.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use super::filters::SymbolFilter;
use super::projection::SymbolRecord;
use crate::features::enrich::EnricherRegistry;
use crate::features::index::Index;
use crate::shared::models::{Document, SymbolInformation, SymbolKind, SymbolRoles};

/// Query handle over an index
#[derive(Debug, Clone)]
pub struct SymbolQuery<'a> {
    index: &'a Index,
    filters: Vec<SymbolFilter>,
}

impl<'a> SymbolQuery<'a> {
    /// Match-all query over the index
    pub fn new(index: &'a Index) -> Self {
        Self {
            index,
            filters: Vec::new(),
        }
    }

    fn and(mut self, filter: SymbolFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn by_kind(self, kind: SymbolKind) -> Self {
        self.and(SymbolFilter::Kind(kind))
    }

    /// Match any of the given kinds
    pub fn by_kinds(self, kinds: Vec<SymbolKind>) -> Self {
        self.and(SymbolFilter::Kinds(kinds))
    }

    pub fn by_language(self, language: impl Into<String>) -> Self {
        self.and(SymbolFilter::Language(language.into()))
    }

    pub fn by_name(self, name: impl Into<String>, exact: bool) -> Self {
        self.and(SymbolFilter::Name {
            name: name.into(),
            exact,
        })
    }

    pub fn by_pattern(self, pattern: Regex) -> Self {
        self.and(SymbolFilter::Pattern(pattern))
    }

    pub fn by_document(self, path: impl Into<String>) -> Self {
        self.and(SymbolFilter::Document(path.into()))
    }

    pub fn has_documentation(self) -> Self {
        self.and(SymbolFilter::HasDocumentation(true))
    }

    /// Definition occurrence must carry every bit of `mask`
    pub fn with_role(self, mask: SymbolRoles) -> Self {
        self.and(SymbolFilter::Role(mask))
    }

    pub fn by_custom(
        self,
        predicate: impl Fn(&SymbolInformation, &Document) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.and(SymbolFilter::Custom(std::sync::Arc::new(predicate)))
    }

    /// Declared symbols matching every filter, in symbol-table order
    pub fn symbols(&self) -> Vec<&'a SymbolInformation> {
        self.matching().map(|(_, info)| info).collect()
    }

    /// Execute and project into the external record shape
    pub fn execute(&self) -> Vec<SymbolRecord> {
        let records: Vec<SymbolRecord> = self
            .matching()
            .map(|(document, info)| SymbolRecord::project(document, info))
            .collect();
        debug!(
            filters = self.filters.len(),
            results = records.len(),
            "query executed"
        );
        records
    }

    /// Execute, then apply every registered enricher to each record
    pub fn execute_with(&self, enrichers: &EnricherRegistry) -> Vec<SymbolRecord> {
        self.matching()
            .map(|(document, info)| {
                let mut record = SymbolRecord::project(document, info);
                record.extra = enrichers.enrich(&info.symbol, info);
                record
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.matching().count()
    }

    pub fn first(&self) -> Option<SymbolRecord> {
        self.matching()
            .next()
            .map(|(document, info)| SymbolRecord::project(document, info))
    }

    pub fn exists(&self) -> bool {
        self.matching().next().is_some()
    }

    pub fn group_by_kind(&self) -> BTreeMap<SymbolKind, Vec<SymbolRecord>> {
        let mut groups: BTreeMap<SymbolKind, Vec<SymbolRecord>> = BTreeMap::new();
        for (document, info) in self.matching() {
            groups
                .entry(info.kind)
                .or_default()
                .push(SymbolRecord::project(document, info));
        }
        groups
    }

    pub fn group_by_document(&self) -> BTreeMap<String, Vec<SymbolRecord>> {
        let mut groups: BTreeMap<String, Vec<SymbolRecord>> = BTreeMap::new();
        for (document, info) in self.matching() {
            groups
                .entry(document.relative_path.clone())
                .or_default()
                .push(SymbolRecord::project(document, info));
        }
        groups
    }

    /// Identity of the index this query reads from
    pub fn index_id(&self) -> u64 {
        self.index.id()
    }

    /// Canonical parameter string for cache keying.
    ///
    /// Tokens are sorted so commuting refinements key identically. `None`
    /// when a custom predicate makes the chain non-canonical.
    pub fn cache_params(&self) -> Option<String> {
        let mut tokens = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            tokens.push(filter.cache_token()?);
        }
        tokens.sort_unstable();
        Some(tokens.join("&"))
    }

    fn matching(&self) -> impl Iterator<Item = (&'a Document, &'a SymbolInformation)> + '_ {
        let index = self.index;
        index.symbol_order().iter().filter_map(move |symbol| {
            let info = index.symbol_info(symbol)?;
            let document = index.defining_document(symbol)?;
            if self
                .filters
                .iter()
                .all(|filter| filter.matches(index, document, info))
            {
                Some((document, info))
            } else {
                None
            }
        })
    }
}
