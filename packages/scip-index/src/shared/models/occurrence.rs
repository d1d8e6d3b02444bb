//! Occurrence and symbol-role types
//!
//! SCIP-compatible role tracking. A role is a set of independent bitflags
//! combined on one occurrence and tested with bitwise AND, never equality:
//! a single occurrence can be a definition, generated, and test code at once.

use serde::{Deserialize, Serialize};

use super::Range;

/// Symbol role bitflags (SCIP bit values)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolRole {
    Definition = 1,
    Import = 2,
    WriteAccess = 4,
    ReadAccess = 8,
    Generated = 16,
    Test = 32,
    ForwardDefinition = 64,
}

/// Combined roles as a bitmask
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct SymbolRoles(pub u32);

impl SymbolRoles {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn definition() -> Self {
        Self(SymbolRole::Definition as u32)
    }

    pub fn import() -> Self {
        Self(SymbolRole::Import as u32)
    }

    pub fn read_access() -> Self {
        Self(SymbolRole::ReadAccess as u32)
    }

    pub fn write_access() -> Self {
        Self(SymbolRole::WriteAccess as u32)
    }

    pub fn with(mut self, role: SymbolRole) -> Self {
        self.add(role);
        self
    }

    pub fn add(&mut self, role: SymbolRole) {
        self.0 |= role as u32;
    }

    pub fn has(&self, role: SymbolRole) -> bool {
        self.0 & (role as u32) != 0
    }

    /// True when every bit in `mask` is set
    pub fn has_all(&self, mask: SymbolRoles) -> bool {
        self.0 & mask.0 == mask.0
    }

    pub fn is_definition(&self) -> bool {
        self.has(SymbolRole::Definition)
    }

    pub fn is_import(&self) -> bool {
        self.has(SymbolRole::Import)
    }

    pub fn is_write_access(&self) -> bool {
        self.has(SymbolRole::WriteAccess)
    }

    pub fn is_read_access(&self) -> bool {
        self.has(SymbolRole::ReadAccess)
    }

    pub fn is_generated(&self) -> bool {
        self.has(SymbolRole::Generated)
    }

    pub fn is_test(&self) -> bool {
        self.has(SymbolRole::Test)
    }

    /// Any non-definition occurrence is a reference
    pub fn is_reference(&self) -> bool {
        !self.is_definition()
    }
}

/// One textual appearance of a symbol at a specific range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Symbol identifier this occurrence refers to
    pub symbol: String,

    /// Source location
    pub range: Range,

    /// Role bitmask
    pub roles: SymbolRoles,
}

impl Occurrence {
    pub fn new(symbol: impl Into<String>, range: Range, roles: SymbolRoles) -> Self {
        Self {
            symbol: symbol.into(),
            range,
            roles,
        }
    }

    pub fn is_definition(&self) -> bool {
        self.roles.is_definition()
    }

    pub fn is_import(&self) -> bool {
        self.roles.is_import()
    }

    /// Call-shaped reference: not a definition and not an import.
    ///
    /// Importing a function mentions it without invoking it, so import
    /// occurrences never contribute call edges.
    pub fn is_call_shaped(&self) -> bool {
        !self.roles.is_definition() && !self.roles.is_import()
    }
}
