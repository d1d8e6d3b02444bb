//! Error types for scip-index
//!
//! Only record-level malformation is a hard error. Structural anomalies in
//! otherwise well-formed input (duplicate definitions, dangling references)
//! degrade into build diagnostics instead of failing construction.

use thiserror::Error;

/// Main error type for scip-index operations
#[derive(Debug, Error)]
pub enum ScipIndexError {
    /// Symbol string could not be decomposed by the symbol grammar.
    ///
    /// Fatal only to the decomposition call, never to index construction.
    #[error("malformed symbol `{raw}` (failed at offset {position})")]
    MalformedSymbol { raw: String, position: usize },

    /// Record payload could not be deserialized
    #[error("parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScipIndexError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        ScipIndexError::Parse(msg.into())
    }

    /// Create a malformed-symbol error
    pub fn malformed_symbol(raw: impl Into<String>, position: usize) -> Self {
        ScipIndexError::MalformedSymbol {
            raw: raw.into(),
            position,
        }
    }
}

/// Result type alias for scip-index operations
pub type Result<T> = std::result::Result<T, ScipIndexError>;
