//! Symbol metadata types
//!
//! `SymbolInformation` is owned by exactly one document (the one declaring
//! it) and referenced by symbol id everywhere else.

use serde::{Deserialize, Serialize};

/// Symbol kind (enumerated code + string form)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum SymbolKind {
    #[default]
    Unspecified = 0,
    Class = 1,
    Constant = 2,
    Constructor = 3,
    Enum = 4,
    EnumMember = 5,
    Field = 6,
    File = 7,
    Function = 8,
    Getter = 9,
    Interface = 10,
    Macro = 11,
    Method = 12,
    Module = 13,
    Namespace = 14,
    Object = 15,
    Package = 16,
    Parameter = 17,
    Property = 18,
    Setter = 19,
    StaticMethod = 20,
    Struct = 21,
    Trait = 22,
    Type = 23,
    TypeAlias = 24,
    TypeParameter = 25,
    Union = 26,
    Variable = 27,
}

impl SymbolKind {
    /// Enumerated code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// String form, used in projections and distributions
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Unspecified => "Unspecified",
            SymbolKind::Class => "Class",
            SymbolKind::Constant => "Constant",
            SymbolKind::Constructor => "Constructor",
            SymbolKind::Enum => "Enum",
            SymbolKind::EnumMember => "EnumMember",
            SymbolKind::Field => "Field",
            SymbolKind::File => "File",
            SymbolKind::Function => "Function",
            SymbolKind::Getter => "Getter",
            SymbolKind::Interface => "Interface",
            SymbolKind::Macro => "Macro",
            SymbolKind::Method => "Method",
            SymbolKind::Module => "Module",
            SymbolKind::Namespace => "Namespace",
            SymbolKind::Object => "Object",
            SymbolKind::Package => "Package",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::Property => "Property",
            SymbolKind::Setter => "Setter",
            SymbolKind::StaticMethod => "StaticMethod",
            SymbolKind::Struct => "Struct",
            SymbolKind::Trait => "Trait",
            SymbolKind::Type => "Type",
            SymbolKind::TypeAlias => "TypeAlias",
            SymbolKind::TypeParameter => "TypeParameter",
            SymbolKind::Union => "Union",
            SymbolKind::Variable => "Variable",
        }
    }

    /// Call-graph node eligibility
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Method)
    }

    /// Inheritance-graph node eligibility
    pub fn is_type_like(&self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::Interface)
    }
}

/// Relationship from one symbol to another
///
/// The kinds are independent flags: a single relationship entry can mark
/// its target as both a reference and an implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Target symbol id
    pub symbol: String,

    #[serde(default)]
    pub is_reference: bool,

    #[serde(default)]
    pub is_implementation: bool,

    #[serde(default)]
    pub is_type_definition: bool,

    #[serde(default)]
    pub is_override: bool,
}

impl Relationship {
    pub fn implementation(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            is_reference: false,
            is_implementation: true,
            is_type_definition: false,
            is_override: false,
        }
    }

    pub fn type_definition(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            is_reference: false,
            is_implementation: false,
            is_type_definition: true,
            is_override: false,
        }
    }
}

/// Symbol metadata: display name, kind, documentation, relationships
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInformation {
    /// Globally unique symbol id; equality is byte-exact
    pub symbol: String,

    pub display_name: String,

    pub kind: SymbolKind,

    /// Ordered documentation blocks (markdown)
    #[serde(default)]
    pub documentation: Vec<String>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Enclosing symbol id, for locals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_symbol: Option<String>,
}

impl SymbolInformation {
    pub fn new(symbol: impl Into<String>, display_name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            kind,
            documentation: Vec::new(),
            relationships: Vec::new(),
            enclosing_symbol: None,
        }
    }

    pub fn with_documentation(mut self, docs: Vec<String>) -> Self {
        self.documentation = docs;
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn has_documentation(&self) -> bool {
        self.documentation.iter().any(|block| !block.is_empty())
    }

    /// Targets of relationships tagged as implementations
    pub fn implementation_targets(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .filter(|rel| rel.is_implementation)
            .map(|rel| rel.symbol.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_code_and_name() {
        assert_eq!(SymbolKind::Function.code(), 8);
        assert_eq!(SymbolKind::Function.as_str(), "Function");
        assert_eq!(SymbolKind::Class.as_str(), "Class");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(SymbolKind::Function.is_callable());
        assert!(SymbolKind::Method.is_callable());
        assert!(!SymbolKind::Class.is_callable());

        assert!(SymbolKind::Class.is_type_like());
        assert!(SymbolKind::Interface.is_type_like());
        assert!(!SymbolKind::Variable.is_type_like());
    }

    #[test]
    fn test_has_documentation_ignores_empty_blocks() {
        let bare = SymbolInformation::new("x", "x", SymbolKind::Variable);
        assert!(!bare.has_documentation());

        let empty_block = bare.clone().with_documentation(vec![String::new()]);
        assert!(!empty_block.has_documentation());

        let documented = bare.with_documentation(vec!["Does things.".to_string()]);
        assert!(documented.has_documentation());
    }
}
