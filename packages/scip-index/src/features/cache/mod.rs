//! Derived-result cache
//!
//! Compute-once, read-many memoization for graphs and query results. Keys
//! combine the index identity with the operation name and canonicalized
//! parameters; since an index is immutable for its whole lifetime, entries
//! never need independent invalidation — they die with their cache.

mod analyses;
mod derived_cache;

pub use analyses::Analyses;
pub use derived_cache::{CacheKey, DerivedCache};
