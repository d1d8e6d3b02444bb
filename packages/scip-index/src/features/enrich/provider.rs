//! Source text providers
//!
//! Enrichers that inspect source code get it through this boundary instead
//! of reading files themselves.

use std::path::PathBuf;

/// Capability: resolve a document's relative path to its source text
pub trait SourceProvider: Send + Sync {
    /// Full content of the file, or `None` when unavailable
    fn content(&self, relative_path: &str) -> Option<String>;
}

/// Provider reading from a project root on the local filesystem
pub struct FileSystemSourceProvider {
    root: PathBuf,
}

impl FileSystemSourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for FileSystemSourceProvider {
    fn content(&self, relative_path: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(relative_path)).ok()
    }
}
