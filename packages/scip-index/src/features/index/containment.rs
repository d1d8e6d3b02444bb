//! Per-document containment index
//!
//! Answers "smallest definition range enclosing a point" queries. Definition
//! ranges are expected to nest or stay disjoint; entries are kept sorted by
//! (start ascending, end descending) with a running maximum of end positions,
//! so a stab is a binary search plus a bounded backward walk: the walk stops
//! as soon as the running maximum falls before the query point.

use crate::shared::models::{Occurrence, Position, Range};

/// One definition range in the containment index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainmentEntry {
    pub symbol: String,
    pub range: Range,
}

/// Ordered-by-range structure over a document's definition occurrences
#[derive(Debug, Clone, Default)]
pub struct ContainmentIndex {
    /// Sorted by (start asc, end desc); outer ranges precede inner ones
    entries: Vec<ContainmentEntry>,

    /// Running maximum of `entries[..=i]` end positions
    max_end_prefix: Vec<Position>,
}

impl ContainmentIndex {
    /// Build from a document's occurrences, keeping definition roles only
    pub fn from_occurrences(occurrences: &[Occurrence]) -> Self {
        let mut entries: Vec<ContainmentEntry> = occurrences
            .iter()
            .filter(|occ| occ.is_definition())
            .map(|occ| ContainmentEntry {
                symbol: occ.symbol.clone(),
                range: occ.range,
            })
            .collect();

        entries.sort_by(|a, b| {
            a.range
                .start()
                .cmp(&b.range.start())
                .then(b.range.end().cmp(&a.range.end()))
        });

        let mut max_end_prefix = Vec::with_capacity(entries.len());
        let mut running_max = Position::new(0, 0);
        for entry in &entries {
            running_max = running_max.max(entry.range.end());
            max_end_prefix.push(running_max);
        }

        Self {
            entries,
            max_end_prefix,
        }
    }

    /// Smallest definition range enclosing `pos`
    pub fn enclosing_at(&self, pos: Position) -> Option<&ContainmentEntry> {
        self.candidates(pos).next()
    }

    /// All definition ranges enclosing `pos`, innermost first
    pub fn enclosing_chain_at(&self, pos: Position) -> Vec<&ContainmentEntry> {
        self.candidates(pos).collect()
    }

    /// Enclosing candidates in innermost-first order.
    ///
    /// Only entries starting at or before `pos` can contain it; walking those
    /// backwards visits later (inner) starts before earlier (outer) ones, and
    /// the prefix maximum bounds how far back a containing range can sit.
    fn candidates(&self, pos: Position) -> impl Iterator<Item = &ContainmentEntry> {
        let upper = self
            .entries
            .partition_point(|entry| entry.range.start() <= pos);

        self.entries[..upper]
            .iter()
            .enumerate()
            .rev()
            .take_while(move |(i, _)| self.max_end_prefix[*i] >= pos)
            .filter(move |(_, entry)| entry.range.contains_position(pos))
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
