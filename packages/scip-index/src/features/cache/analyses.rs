//! Memoized analysis session
//!
//! Owns an index together with the caches for everything derived from it,
//! so cached graphs and results can never outlive the index they borrow
//! their identifiers from.

use std::sync::Arc;

use super::derived_cache::{CacheKey, DerivedCache};
use crate::features::graphs::{CallGraph, DependencyGraph, InheritanceGraph};
use crate::features::index::Index;
use crate::features::query::{IndexStatistics, SymbolQuery, SymbolRecord};

/// An index plus memoized derived results
pub struct Analyses {
    index: Index,
    call_graphs: DerivedCache<CallGraph>,
    dependency_graphs: DerivedCache<DependencyGraph>,
    inheritance_graphs: DerivedCache<InheritanceGraph>,
    statistics: DerivedCache<IndexStatistics>,
    query_results: DerivedCache<Vec<SymbolRecord>>,
}

impl Analyses {
    pub fn new(index: Index) -> Self {
        Self {
            index,
            call_graphs: DerivedCache::new(),
            dependency_graphs: DerivedCache::new(),
            inheritance_graphs: DerivedCache::new(),
            statistics: DerivedCache::new(),
            query_results: DerivedCache::new(),
        }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Start a query over the owned index
    pub fn query(&self) -> SymbolQuery<'_> {
        SymbolQuery::new(&self.index)
    }

    /// Call graph, computed once per session
    pub fn call_graph(&self) -> Arc<CallGraph> {
        self.call_graphs
            .get_or_compute(self.key("call_graph", ""), || CallGraph::build(&self.index))
    }

    /// Dependency graph, computed once per session
    pub fn dependency_graph(&self) -> Arc<DependencyGraph> {
        self.dependency_graphs
            .get_or_compute(self.key("dependency_graph", ""), || {
                DependencyGraph::build(&self.index)
            })
    }

    /// Inheritance graph, computed once per session
    pub fn inheritance_graph(&self) -> Arc<InheritanceGraph> {
        self.inheritance_graphs
            .get_or_compute(self.key("inheritance_graph", ""), || {
                InheritanceGraph::build(&self.index)
            })
    }

    /// Statistics, computed once per session
    pub fn statistics(&self) -> Arc<IndexStatistics> {
        self.statistics
            .get_or_compute(self.key("statistics", ""), || self.index.get_statistics())
    }

    /// Execute a query, caching the result when its filter chain has a
    /// canonical form. Queries with custom predicates execute uncached.
    pub fn execute_cached(&self, query: &SymbolQuery<'_>) -> Arc<Vec<SymbolRecord>> {
        match query.cache_params() {
            Some(params) => self.query_results.get_or_compute(
                CacheKey::new(query.index_id(), "query", params),
                || query.execute(),
            ),
            None => Arc::new(query.execute()),
        }
    }

    fn key(&self, operation: &'static str, params: impl Into<String>) -> CacheKey {
        CacheKey::new(self.index.id(), operation, params)
    }
}
