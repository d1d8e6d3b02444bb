//! Result record projection
//!
//! Field names are part of the external contract.

use serde::Serialize;

use crate::shared::models::{Document, SymbolInformation};

/// Flattened per-symbol result record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SymbolRecord {
    /// Symbol identifier string
    pub symbol: String,

    pub display_name: String,

    /// Enumerated kind code
    pub kind: u32,

    /// String form of the kind
    pub kind_name: String,

    /// Relative path of the owning document
    pub document: String,

    pub language: String,

    /// Ordered documentation blocks
    pub documentation: Vec<String>,

    /// Supplemental fields added by registered enrichers
    #[serde(flatten, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SymbolRecord {
    /// Project a declared symbol into the external record shape
    pub fn project(document: &Document, info: &SymbolInformation) -> Self {
        Self {
            symbol: info.symbol.clone(),
            display_name: info.display_name.clone(),
            kind: info.kind.code(),
            kind_name: info.kind.as_str().to_string(),
            document: document.relative_path.clone(),
            language: document.language.clone(),
            documentation: info.documentation.clone(),
            extra: serde_json::Map::new(),
        }
    }
}
