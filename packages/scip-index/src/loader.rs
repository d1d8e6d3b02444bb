//! Raw record ingestion
//!
//! Deserializes a code-intelligence payload into the record model the index
//! builder consumes. The binary wire protocol lives outside this crate; the
//! boundary here is the already-deserialized JSON shape of an index payload.
//!
//! Conversion fills in metadata the producer omitted: missing display names
//! and `Unspecified` kinds are inferred from the symbol string for
//! non-local symbols, and compact 3-element ranges are normalized.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{Result, ScipIndexError};
use crate::shared::models::{
    Document, Occurrence, Range, Relationship, SymbolInformation, SymbolKind, SymbolRoles,
};
use crate::symbol;

/// Ordered sequence of document records, ready for index construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecordSet {
    pub documents: Vec<Document>,
}

impl RawRecordSet {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Load a record set from a JSON payload
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let raw: RawIndex = serde_json::from_slice(data)
            .map_err(|e| ScipIndexError::parse_error(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Load a record set from a JSON reader
    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self> {
        let raw: RawIndex = serde_json::from_reader(reader)
            .map_err(|e| ScipIndexError::parse_error(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawIndex) -> Result<Self> {
        debug!(documents = raw.documents.len(), "converting raw records");
        let documents = raw
            .documents
            .into_iter()
            .map(convert_document)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { documents })
    }
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(default)]
    documents: Vec<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    relative_path: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    occurrences: Vec<RawOccurrence>,
    #[serde(default)]
    symbols: Vec<RawSymbolInformation>,
}

#[derive(Debug, Deserialize)]
struct RawOccurrence {
    symbol: String,
    range: Vec<u32>,
    #[serde(default)]
    symbol_roles: u32,
}

#[derive(Debug, Deserialize)]
struct RawSymbolInformation {
    symbol: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    kind: SymbolKind,
    #[serde(default)]
    documentation: Vec<String>,
    #[serde(default)]
    relationships: Vec<Relationship>,
    #[serde(default)]
    enclosing_symbol: Option<String>,
}

fn convert_document(raw: RawDocument) -> Result<Document> {
    debug!(
        path = %raw.relative_path,
        occurrences = raw.occurrences.len(),
        symbols = raw.symbols.len(),
        "converting document"
    );

    let occurrences = raw
        .occurrences
        .into_iter()
        .map(|occ| convert_occurrence(occ, &raw.relative_path))
        .collect::<Result<Vec<_>>>()?;

    let symbols = raw.symbols.into_iter().map(convert_symbol_info).collect();

    Ok(Document {
        relative_path: raw.relative_path,
        language: raw.language,
        occurrences,
        symbols,
    })
}

fn convert_occurrence(raw: RawOccurrence, path: &str) -> Result<Occurrence> {
    let range = Range::from_compact(&raw.range).ok_or_else(|| {
        ScipIndexError::parse_error(format!(
            "occurrence of `{}` in {} has a {}-element range",
            raw.symbol,
            path,
            raw.range.len()
        ))
    })?;

    Ok(Occurrence {
        symbol: raw.symbol,
        range,
        roles: SymbolRoles(raw.symbol_roles),
    })
}

fn convert_symbol_info(raw: RawSymbolInformation) -> SymbolInformation {
    let is_local = raw.symbol.starts_with("local ");

    let display_name = if raw.display_name.is_empty() && !is_local {
        let (inferred, _) = symbol::infer_metadata(&raw.symbol);
        inferred
    } else {
        raw.display_name
    };

    let kind = if raw.kind == SymbolKind::Unspecified && !is_local {
        let (_, inferred) = symbol::infer_metadata(&raw.symbol);
        if inferred != SymbolKind::Unspecified {
            warn!(
                symbol = %raw.symbol,
                kind = inferred.as_str(),
                "symbol kind unspecified, inferred from symbol string"
            );
        }
        inferred
    } else {
        raw.kind
    };

    SymbolInformation {
        symbol: raw.symbol,
        display_name,
        kind,
        documentation: raw.documentation,
        relationships: raw.relationships,
        enclosing_symbol: raw.enclosing_symbol,
    }
}
