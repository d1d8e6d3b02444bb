//! SCIP symbol grammar
//!
//! Decomposes opaque symbol strings into scheme / package / descriptor
//! chains and formats them back. The grammar:
//!
//! ```text
//! <symbol>     ::= <scheme> ' ' <manager> ' ' <name> ' ' <version> ' ' <descriptors>
//!                | 'local ' <local-id>
//! <descriptor> ::= <name> '/'            namespace
//!                | <name> '#'            type
//!                | <name> '.'            term
//!                | <name> '(' <dis> ').' method (optional disambiguator)
//!                | '(' <name> ')'        parameter
//!                | '[' <name> ']'        type parameter
//!                | <name> ':'            meta
//!                | <name> '!'            macro
//! ```
//!
//! A doubled space inside the package prefix escapes a literal space, and a
//! doubled backtick inside an escaped identifier escapes a literal backtick.
//! Decomposition failures are fatal only to the individual call.

use std::num::NonZeroUsize;

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::errors::{Result, ScipIndexError};
use crate::shared::models::SymbolKind;

const SIMPLE_ID_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_+-$";

const PARSE_CACHE_SIZE: usize = 50_000;

/// Offset (in chars) where an uncached parse failed
type FailureOffset = usize;

static PARSE_CACHE: Lazy<Mutex<LruCache<String, std::result::Result<ParsedSymbol, FailureOffset>>>> =
    Lazy::new(|| {
        Mutex::new(LruCache::new(
            NonZeroUsize::new(PARSE_CACHE_SIZE).expect("cache size is non-zero"),
        ))
    });

/// Package portion of a symbol: manager, name, version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    pub manager: String,
    pub name: String,
    pub version: String,
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.manager, self.name, self.version)
    }
}

/// Descriptor suffix, determining the descriptor's role in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorSuffix {
    Namespace,
    Type,
    Term,
    Method,
    TypeParameter,
    Parameter,
    Meta,
    Macro,
    Local,
}

impl DescriptorSuffix {
    fn kind_hint(&self) -> SymbolKind {
        match self {
            DescriptorSuffix::Namespace => SymbolKind::Namespace,
            DescriptorSuffix::Type => SymbolKind::Type,
            DescriptorSuffix::Term => SymbolKind::Variable,
            DescriptorSuffix::Method => SymbolKind::Method,
            DescriptorSuffix::TypeParameter => SymbolKind::TypeParameter,
            DescriptorSuffix::Parameter => SymbolKind::Parameter,
            DescriptorSuffix::Meta => SymbolKind::Unspecified,
            DescriptorSuffix::Macro => SymbolKind::Macro,
            DescriptorSuffix::Local => SymbolKind::Variable,
        }
    }
}

/// One descriptor in the symbol hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub name: String,
    pub disambiguator: String,
    pub suffix: DescriptorSuffix,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, suffix: DescriptorSuffix) -> Self {
        Self {
            name: name.into(),
            disambiguator: String::new(),
            suffix,
        }
    }
}

/// Decomposed symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedSymbol {
    pub scheme: String,
    pub package: Option<Package>,
    pub descriptors: Vec<Descriptor>,
}

impl ParsedSymbol {
    /// Dotted path of descriptor names
    pub fn fully_qualified_name(&self) -> String {
        self.descriptors
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Symbol with the last descriptor removed, if any remain
    pub fn parent(&self) -> Option<ParsedSymbol> {
        if self.descriptors.len() <= 1 {
            return None;
        }
        Some(ParsedSymbol {
            scheme: self.scheme.clone(),
            package: self.package.clone(),
            descriptors: self.descriptors[..self.descriptors.len() - 1].to_vec(),
        })
    }
}

/// Parse a symbol string, consulting the shared parse cache
pub fn parse(symbol: &str) -> Result<ParsedSymbol> {
    {
        let mut cache = PARSE_CACHE.lock();
        if let Some(cached) = cache.get(symbol) {
            return match cached {
                Ok(parsed) => Ok(parsed.clone()),
                Err(position) => Err(ScipIndexError::malformed_symbol(symbol, *position)),
            };
        }
    }

    let outcome = parse_uncached(symbol);
    PARSE_CACHE.lock().put(symbol.to_string(), outcome.clone());

    outcome.map_err(|position| ScipIndexError::malformed_symbol(symbol, position))
}

/// Infer a display name and kind from a symbol string.
///
/// Falls back to an empty name and `Unspecified` when the symbol does not
/// decompose; callers use this for records missing explicit metadata.
pub fn infer_metadata(symbol: &str) -> (String, SymbolKind) {
    match parse(symbol) {
        Ok(parsed) => match parsed.descriptors.last() {
            Some(last) => (last.name.clone(), last.suffix.kind_hint()),
            None => (String::new(), SymbolKind::Unspecified),
        },
        Err(_) => (String::new(), SymbolKind::Unspecified),
    }
}

/// Format a decomposed symbol back to its string form
pub fn format(symbol: &ParsedSymbol) -> String {
    if symbol.scheme == "local" {
        if let Some(first) = symbol.descriptors.first() {
            return format!("local {}", first.name);
        }
        return "local ".to_string();
    }

    let descriptors: String = symbol.descriptors.iter().map(format_descriptor).collect();

    match &symbol.package {
        Some(package) => format!("{} {} {}", symbol.scheme, package, descriptors),
        None => format!("{} . . . {}", symbol.scheme, descriptors),
    }
}

fn format_descriptor(descriptor: &Descriptor) -> String {
    match descriptor.suffix {
        DescriptorSuffix::Method => {
            if descriptor.disambiguator.is_empty() {
                format!("{}().", descriptor.name)
            } else {
                format!("{}({}).", descriptor.name, descriptor.disambiguator)
            }
        }
        DescriptorSuffix::Parameter => format!("({})", descriptor.name),
        DescriptorSuffix::TypeParameter => format!("[{}]", descriptor.name),
        DescriptorSuffix::Namespace => format!("{}/", descriptor.name),
        DescriptorSuffix::Type => format!("{}#", descriptor.name),
        DescriptorSuffix::Term => format!("{}.", descriptor.name),
        DescriptorSuffix::Meta => format!("{}:", descriptor.name),
        DescriptorSuffix::Macro => format!("{}!", descriptor.name),
        DescriptorSuffix::Local => descriptor.name.clone(),
    }
}

fn parse_uncached(symbol: &str) -> std::result::Result<ParsedSymbol, FailureOffset> {
    if let Some(local_id) = symbol.strip_prefix("local ") {
        if local_id.is_empty() {
            return Err(symbol.chars().count());
        }
        return Ok(ParsedSymbol {
            scheme: "local".to_string(),
            package: None,
            descriptors: vec![Descriptor::new(local_id, DescriptorSuffix::Local)],
        });
    }

    let chars: Vec<char> = symbol.chars().collect();
    let (parts, rest_start) = split_prefix(&chars, 4);

    if parts.len() < 4 || rest_start >= chars.len() {
        return Err(rest_start.min(chars.len()));
    }

    let scheme = parts[0].clone();
    let package = Package {
        manager: parts[1].clone(),
        name: parts[2].clone(),
        version: parts[3].clone(),
    };

    let descriptors = parse_descriptors(&chars[rest_start..]);
    if descriptors.is_empty() {
        return Err(rest_start);
    }

    Ok(ParsedSymbol {
        scheme,
        package: Some(package),
        descriptors,
    })
}

/// Split off `count` space-separated fields; `"  "` escapes a literal space.
///
/// Returns the fields and the offset where the remainder begins.
fn split_prefix(chars: &[char], count: usize) -> (Vec<String>, usize) {
    let mut parts = Vec::with_capacity(count);
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() && parts.len() < count {
        if chars[i] == ' ' {
            if i + 1 < chars.len() && chars[i + 1] == ' ' {
                current.push(' ');
                i += 2;
            } else {
                parts.push(std::mem::take(&mut current));
                i += 1;
            }
        } else {
            current.push(chars[i]);
            i += 1;
        }
    }

    if parts.len() < count && !current.is_empty() {
        parts.push(current);
    }

    (parts, i)
}

fn parse_descriptors(chars: &[char]) -> Vec<Descriptor> {
    let mut descriptors = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        match try_parse_descriptor(chars, pos) {
            Some((descriptor, next)) => {
                descriptors.push(descriptor);
                pos = next;
            }
            // Lenient: skip over characters no descriptor form accepts
            None => pos += 1,
        }
    }

    descriptors
}

fn try_parse_descriptor(chars: &[char], pos: usize) -> Option<(Descriptor, usize)> {
    match chars.get(pos)? {
        '[' => parse_type_parameter(chars, pos),
        '(' => parse_parameter(chars, pos),
        _ => {
            let (name, after_id) = parse_identifier(chars, pos)?;
            let next = *chars.get(after_id)?;

            if next == '(' {
                return parse_method(chars, name, after_id);
            }

            let suffix = match next {
                '/' => DescriptorSuffix::Namespace,
                '#' => DescriptorSuffix::Type,
                '.' => DescriptorSuffix::Term,
                ':' => DescriptorSuffix::Meta,
                '!' => DescriptorSuffix::Macro,
                _ => return None,
            };

            Some((Descriptor::new(name, suffix), after_id + 1))
        }
    }
}

fn parse_identifier(chars: &[char], pos: usize) -> Option<(String, usize)> {
    if *chars.get(pos)? == '`' {
        parse_escaped_identifier(chars, pos)
    } else {
        parse_simple_identifier(chars, pos)
    }
}

fn parse_simple_identifier(chars: &[char], pos: usize) -> Option<(String, usize)> {
    let start = pos;
    let mut pos = pos;
    while pos < chars.len() && SIMPLE_ID_CHARS.contains(chars[pos]) {
        pos += 1;
    }
    if pos == start {
        return None;
    }
    Some((chars[start..pos].iter().collect(), pos))
}

fn parse_escaped_identifier(chars: &[char], pos: usize) -> Option<(String, usize)> {
    let mut pos = pos + 1;
    let mut content = String::new();

    while pos < chars.len() {
        if chars[pos] == '`' {
            if chars.get(pos + 1) == Some(&'`') {
                content.push('`');
                pos += 2;
            } else {
                return Some((content, pos + 1));
            }
        } else {
            content.push(chars[pos]);
            pos += 1;
        }
    }

    // Unterminated escape
    None
}

fn parse_method(chars: &[char], name: String, paren_pos: usize) -> Option<(Descriptor, usize)> {
    let mut pos = paren_pos + 1;
    let dis_start = pos;

    while pos < chars.len() && SIMPLE_ID_CHARS.contains(chars[pos]) {
        pos += 1;
    }

    let disambiguator: String = chars[dis_start..pos].iter().collect();

    if chars.get(pos) != Some(&')') || chars.get(pos + 1) != Some(&'.') {
        return None;
    }

    Some((
        Descriptor {
            name,
            disambiguator,
            suffix: DescriptorSuffix::Method,
        },
        pos + 2,
    ))
}

fn parse_type_parameter(chars: &[char], pos: usize) -> Option<(Descriptor, usize)> {
    let (name, after_id) = parse_identifier(chars, pos + 1)?;
    if chars.get(after_id) != Some(&']') {
        return None;
    }
    Some((Descriptor::new(name, DescriptorSuffix::TypeParameter), after_id + 1))
}

fn parse_parameter(chars: &[char], pos: usize) -> Option<(Descriptor, usize)> {
    let (name, after_id) = parse_identifier(chars, pos + 1)?;
    if chars.get(after_id) != Some(&')') {
        return None;
    }
    // `name().` is a method descriptor, not a parameter
    if chars.get(after_id + 1) == Some(&'.') {
        return None;
    }
    Some((Descriptor::new(name, DescriptorSuffix::Parameter), after_id + 1))
}
