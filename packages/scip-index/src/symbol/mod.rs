//! Symbol string decomposition
//!
//! The rest of the crate treats symbol ids as opaque interned strings; this
//! module is the one place that understands their internal structure.

mod grammar;

pub use grammar::{
    format, infer_metadata, parse, Descriptor, DescriptorSuffix, Package, ParsedSymbol,
};
