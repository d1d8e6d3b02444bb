//! Keyed memoization on a concurrent map

use std::sync::Arc;

use dashmap::DashMap;

/// Cache key: index identity + operation + canonicalized parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Identity of the owning index instance
    pub index_id: u64,

    /// Operation name, e.g. "call_graph"
    pub operation: &'static str,

    /// Canonicalized parameters; empty for parameterless operations
    pub params: String,
}

impl CacheKey {
    pub fn new(index_id: u64, operation: &'static str, params: impl Into<String>) -> Self {
        Self {
            index_id,
            operation,
            params: params.into(),
        }
    }
}

/// Compute-once cache for one value type.
///
/// The entry API holds the key's shard locked while the value is computed,
/// so concurrent first readers of the same key trigger exactly one
/// computation and observe the same `Arc`.
pub struct DerivedCache<V> {
    entries: DashMap<CacheKey, Arc<V>>,
}

impl<V> DerivedCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Fetch the cached value, computing and inserting it on first access
    pub fn get_or_compute(&self, key: CacheKey, compute: impl FnOnce() -> V) -> Arc<V> {
        self.entries
            .entry(key)
            .or_insert_with(|| Arc::new(compute()))
            .clone()
    }

    /// Fetch without computing
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for DerivedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_compute_once_per_key() {
        let cache: DerivedCache<u64> = DerivedCache::new();
        let computed = AtomicUsize::new(0);

        let key = CacheKey::new(1, "op", "");
        let first = cache.get_or_compute(key.clone(), || {
            computed.fetch_add(1, Ordering::SeqCst);
            42
        });
        let second = cache.get_or_compute(key.clone(), || {
            computed.fetch_add(1, Ordering::SeqCst);
            43
        });

        assert_eq!(*first, 42);
        assert_eq!(*second, 42);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(computed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_params_are_distinct_entries() {
        let cache: DerivedCache<&'static str> = DerivedCache::new();

        cache.get_or_compute(CacheKey::new(1, "query", "kind=Function"), || "a");
        cache.get_or_compute(CacheKey::new(1, "query", "kind=Class"), || "b");
        cache.get_or_compute(CacheKey::new(2, "query", "kind=Function"), || "c");

        assert_eq!(cache.len(), 3);
        assert_eq!(
            cache
                .get(&CacheKey::new(1, "query", "kind=Class"))
                .as_deref(),
            Some(&"b")
        );
        assert!(cache.get(&CacheKey::new(3, "query", "kind=Class")).is_none());
    }

    #[test]
    fn test_concurrent_first_access_computes_once() {
        let cache: Arc<DerivedCache<u64>> = Arc::new(DerivedCache::new());
        let computed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let computed = Arc::clone(&computed);
                std::thread::spawn(move || {
                    let value = cache.get_or_compute(CacheKey::new(7, "graph", ""), || {
                        computed.fetch_add(1, Ordering::SeqCst);
                        99
                    });
                    assert_eq!(*value, 99);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(computed.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
