//! Symbol filter predicates
//!
//! A filter matches one declared symbol in the context of its owning
//! document. Filters are values combined by AND in the query handle;
//! custom predicates make the set open-ended without a trait hierarchy.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::features::index::Index;
use crate::shared::models::{Document, SymbolInformation, SymbolKind, SymbolRoles};

/// Caller-supplied predicate over (symbol, owning document)
pub type CustomPredicate = Arc<dyn Fn(&SymbolInformation, &Document) -> bool + Send + Sync>;

/// One refinement in a query's filter chain
#[derive(Clone)]
pub enum SymbolFilter {
    Kind(SymbolKind),
    Kinds(Vec<SymbolKind>),

    /// Language tag, compared case-insensitively
    Language(String),

    /// Display-name match, exact or substring
    Name { name: String, exact: bool },

    /// Regex over the display name
    Pattern(Regex),

    /// Owning document path, exact match
    Document(String),

    HasDocumentation(bool),

    /// Definition occurrence carries every bit of the mask
    Role(SymbolRoles),

    Custom(CustomPredicate),
}

impl SymbolFilter {
    pub(crate) fn matches(
        &self,
        index: &Index,
        document: &Document,
        info: &SymbolInformation,
    ) -> bool {
        match self {
            SymbolFilter::Kind(kind) => info.kind == *kind,
            SymbolFilter::Kinds(kinds) => kinds.contains(&info.kind),
            SymbolFilter::Language(language) => {
                document.language.eq_ignore_ascii_case(language)
            }
            SymbolFilter::Name { name, exact } => {
                if *exact {
                    info.display_name == *name
                } else {
                    info.display_name.contains(name.as_str())
                }
            }
            SymbolFilter::Pattern(regex) => regex.is_match(&info.display_name),
            SymbolFilter::Document(path) => document.relative_path == *path,
            SymbolFilter::HasDocumentation(wanted) => info.has_documentation() == *wanted,
            SymbolFilter::Role(mask) => index
                .find_definition(&info.symbol)
                .map(|(_, occ)| occ.roles.has_all(*mask))
                .unwrap_or(false),
            SymbolFilter::Custom(predicate) => predicate(info, document),
        }
    }

    /// Stable token for cache keying.
    ///
    /// `None` for custom predicates, which have no canonical form; a query
    /// containing one bypasses the derived-result cache.
    pub(crate) fn cache_token(&self) -> Option<String> {
        match self {
            SymbolFilter::Kind(kind) => Some(format!("kind={}", kind.as_str())),
            SymbolFilter::Kinds(kinds) => {
                let mut names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                names.sort_unstable();
                Some(format!("kinds={}", names.join(",")))
            }
            SymbolFilter::Language(language) => {
                Some(format!("language={}", language.to_ascii_lowercase()))
            }
            SymbolFilter::Name { name, exact } => Some(format!("name={name}:exact={exact}")),
            SymbolFilter::Pattern(regex) => Some(format!("pattern={}", regex.as_str())),
            SymbolFilter::Document(path) => Some(format!("document={path}")),
            SymbolFilter::HasDocumentation(wanted) => Some(format!("documented={wanted}")),
            SymbolFilter::Role(mask) => Some(format!("role={}", mask.0)),
            SymbolFilter::Custom(_) => None,
        }
    }
}

impl fmt::Debug for SymbolFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cache_token() {
            Some(token) => write!(f, "SymbolFilter({token})"),
            None => write!(f, "SymbolFilter(custom)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::index::IndexBuilder;
    use crate::loader::RawRecordSet;
    use crate::shared::models::{Occurrence, Range, SymbolRole};

    fn build_index() -> Index {
        let doc = Document::new("src/lib.py", "Python")
            .with_symbols(vec![
                SymbolInformation::new("sym:f", "process", SymbolKind::Function)
                    .with_documentation(vec!["Processes.".to_string()]),
                SymbolInformation::new("sym:C", "Config", SymbolKind::Class),
            ])
            .with_occurrences(vec![Occurrence::new(
                "sym:f",
                Range::new(0, 0, 4, 0),
                SymbolRoles::definition().with(SymbolRole::Test),
            )]);
        IndexBuilder::build(RawRecordSet::new(vec![doc]))
    }

    fn info_and_doc(index: &Index, symbol: &str) -> (SymbolInformation, Document) {
        (
            index.symbol_info(symbol).unwrap().clone(),
            index.defining_document(symbol).unwrap().clone(),
        )
    }

    #[test]
    fn test_kind_filter() {
        let index = build_index();
        let (info, doc) = info_and_doc(&index, "sym:f");

        assert!(SymbolFilter::Kind(SymbolKind::Function).matches(&index, &doc, &info));
        assert!(!SymbolFilter::Kind(SymbolKind::Class).matches(&index, &doc, &info));
        assert!(SymbolFilter::Kinds(vec![SymbolKind::Class, SymbolKind::Function])
            .matches(&index, &doc, &info));
    }

    #[test]
    fn test_language_filter_is_case_insensitive() {
        let index = build_index();
        let (info, doc) = info_and_doc(&index, "sym:f");

        assert!(SymbolFilter::Language("python".to_string()).matches(&index, &doc, &info));
        assert!(SymbolFilter::Language("PYTHON".to_string()).matches(&index, &doc, &info));
        assert!(!SymbolFilter::Language("rust".to_string()).matches(&index, &doc, &info));
    }

    #[test]
    fn test_name_filter_exact_and_substring() {
        let index = build_index();
        let (info, doc) = info_and_doc(&index, "sym:f");

        let exact = SymbolFilter::Name {
            name: "process".to_string(),
            exact: true,
        };
        let partial = SymbolFilter::Name {
            name: "proc".to_string(),
            exact: false,
        };
        let wrong = SymbolFilter::Name {
            name: "proc".to_string(),
            exact: true,
        };

        assert!(exact.matches(&index, &doc, &info));
        assert!(partial.matches(&index, &doc, &info));
        assert!(!wrong.matches(&index, &doc, &info));
    }

    #[test]
    fn test_role_filter_uses_bitmask_and() {
        let index = build_index();
        let (f_info, doc) = info_and_doc(&index, "sym:f");
        let (c_info, _) = info_and_doc(&index, "sym:C");

        // sym:f's definition has Definition|Test set
        let test_mask = SymbolFilter::Role(SymbolRoles::new().with(SymbolRole::Test));
        assert!(test_mask.matches(&index, &doc, &f_info));

        // sym:C has no definition occurrence at all
        assert!(!test_mask.matches(&index, &doc, &c_info));

        let generated = SymbolFilter::Role(SymbolRoles::new().with(SymbolRole::Generated));
        assert!(!generated.matches(&index, &doc, &f_info));
    }

    #[test]
    fn test_custom_filter() {
        let index = build_index();
        let (info, doc) = info_and_doc(&index, "sym:f");

        let custom = SymbolFilter::Custom(Arc::new(|info: &SymbolInformation, _: &Document| {
            info.display_name.len() > 3
        }));
        assert!(custom.matches(&index, &doc, &info));
        assert!(custom.cache_token().is_none());
    }

    #[test]
    fn test_cache_token_is_order_independent_for_kinds() {
        let a = SymbolFilter::Kinds(vec![SymbolKind::Function, SymbolKind::Class]);
        let b = SymbolFilter::Kinds(vec![SymbolKind::Class, SymbolKind::Function]);
        assert_eq!(a.cache_token(), b.cache_token());
    }
}
