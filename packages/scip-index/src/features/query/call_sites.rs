//! Call site location
//!
//! Finds where a caller invokes a callee: the call-shaped occurrences of
//! the callee sitting inside the caller's definition range.

use crate::features::index::Index;
use crate::shared::models::Occurrence;

/// One located invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Document containing the call
    pub document: String,

    /// The callee reference occurrence
    pub occurrence: Occurrence,

    /// Start line of the call (0-based)
    pub line: u32,
}

/// Locates caller → callee invocation sites in an index
pub struct CallSiteLocator<'a> {
    index: &'a Index,
}

impl<'a> CallSiteLocator<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self { index }
    }

    /// First call site of `callee` inside `caller`'s definition
    pub fn find_call_site(&self, caller: &str, callee: &str) -> Option<CallSite> {
        self.sites(caller, callee).next()
    }

    /// Every call site of `callee` inside `caller`'s definition
    pub fn find_all_call_sites(&self, caller: &str, callee: &str) -> Vec<CallSite> {
        self.sites(caller, callee).collect()
    }

    /// Call sites restricted to a line range (0-based, inclusive)
    pub fn find_call_sites_in_range(
        &self,
        caller: &str,
        callee: &str,
        start_line: u32,
        end_line: u32,
    ) -> Vec<CallSite> {
        self.sites(caller, callee)
            .filter(|site| start_line <= site.line && site.line <= end_line)
            .collect()
    }

    fn sites<'b>(
        &'b self,
        caller: &'b str,
        callee: &'b str,
    ) -> impl Iterator<Item = CallSite> + 'b {
        let index = self.index;
        let caller_doc = index.defining_document(caller);

        caller_doc
            .into_iter()
            .flat_map(move |document| {
                document
                    .occurrences
                    .iter()
                    .filter(move |occ| occ.symbol == callee && occ.is_call_shaped())
                    .filter(move |occ| {
                        index.enclosing_callable(&document.relative_path, occ.range.start())
                            == Some(caller)
                    })
                    .map(move |occ| CallSite {
                        document: document.relative_path.clone(),
                        occurrence: occ.clone(),
                        line: occ.range.start_line,
                    })
            })
    }
}
