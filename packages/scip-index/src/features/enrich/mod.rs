//! Symbol enrichment
//!
//! A capability boundary: anything that can turn a symbol into supplemental
//! fields can be registered, and the query surface merges the results into
//! its records. Enrichers are purely additive and never touch the index.

mod provider;

pub use provider::{FileSystemSourceProvider, SourceProvider};

use crate::shared::models::SymbolInformation;

/// Supplemental fields produced by an enricher
pub type SupplementalFields = serde_json::Map<String, serde_json::Value>;

/// Capability: given a symbol, return supplemental fields
pub trait SymbolEnricher: Send + Sync {
    fn enrich(&self, symbol: &str, info: &SymbolInformation) -> SupplementalFields;
}

/// Blanket impl so plain closures register directly
impl<F> SymbolEnricher for F
where
    F: Fn(&str, &SymbolInformation) -> SupplementalFields + Send + Sync,
{
    fn enrich(&self, symbol: &str, info: &SymbolInformation) -> SupplementalFields {
        self(symbol, info)
    }
}

/// Ordered set of registered enrichers
#[derive(Default)]
pub struct EnricherRegistry {
    enrichers: Vec<Box<dyn SymbolEnricher>>,
}

impl EnricherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, enricher: impl SymbolEnricher + 'static) {
        self.enrichers.push(Box::new(enricher));
    }

    pub fn is_empty(&self) -> bool {
        self.enrichers.is_empty()
    }

    /// Merged supplemental fields from every enricher, in registration
    /// order; later enrichers win on key collisions
    pub fn enrich(&self, symbol: &str, info: &SymbolInformation) -> SupplementalFields {
        let mut merged = SupplementalFields::new();
        for enricher in &self.enrichers {
            merged.extend(enricher.enrich(symbol, info));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::SymbolKind;
    use serde_json::json;

    fn info() -> SymbolInformation {
        SymbolInformation::new("sym:f", "f", SymbolKind::Function)
    }

    #[test]
    fn test_empty_registry_adds_nothing() {
        let registry = EnricherRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.enrich("sym:f", &info()).is_empty());
    }

    #[test]
    fn test_closure_enricher() {
        let mut registry = EnricherRegistry::new();
        registry.register(|symbol: &str, _info: &SymbolInformation| {
            let mut fields = SupplementalFields::new();
            fields.insert("id_length".to_string(), json!(symbol.len()));
            fields
        });

        let fields = registry.enrich("sym:f", &info());
        assert_eq!(fields.get("id_length"), Some(&json!(5)));
    }

    #[test]
    fn test_later_enrichers_win_on_collision() {
        let mut registry = EnricherRegistry::new();
        registry.register(|_: &str, _: &SymbolInformation| {
            let mut fields = SupplementalFields::new();
            fields.insert("origin".to_string(), json!("first"));
            fields
        });
        registry.register(|_: &str, _: &SymbolInformation| {
            let mut fields = SupplementalFields::new();
            fields.insert("origin".to_string(), json!("second"));
            fields
        });

        let fields = registry.enrich("sym:f", &info());
        assert_eq!(fields.get("origin"), Some(&json!("second")));
    }
}
