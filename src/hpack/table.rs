//! HPACK dynamic table and reference set.
//!
//! The encoding context is the state both sides must keep in lockstep:
//! an ordered table of recently indexed header fields (index 0 is the
//! most recent insertion; the static table is addressed after it in one
//! combined index space) and the reference set of table entries that
//! are implicitly part of the current header block.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{Error, Result};

use super::static_table;
use super::Header;

/// Per-entry overhead charged against the table limit.
const ENTRY_OVERHEAD: usize = 32;

/// A dynamic table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(name: Vec<u8>, value: Vec<u8>) -> Self {
        Self { name, value }
    }

    /// Cost charged against the table limit.
    pub fn cost(&self) -> usize {
        self.name.len() + self.value.len() + ENTRY_OVERHEAD
    }
}

/// Reference-set bookkeeping mark.
///
/// Marks only matter within one header block: the encoder uses them to
/// defer and deduplicate emissions, the decoder to know which entries
/// still need emitting when the block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Unmarked,
    Emitted,
    Common,
}

/// A reference-set member: a dynamic-table index plus its mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub index: usize,
    pub mark: Mark,
}

/// One header-block representation, shared by encoder and decoder.
///
/// Indices are zero-based into the combined (dynamic, then static)
/// space; the one-based wire form is the codec's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Indexed(usize),
    Incremental { name: Name, value: Vec<u8> },
    NoIndex { name: Name, value: Vec<u8> },
    NeverIndexed { name: Name, value: Vec<u8> },
    ChangeTableSize(usize),
    RefsetEmpty,
}

/// A header name in a literal representation: indexed or spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    Index(usize),
    Literal(Vec<u8>),
}

/// Shared encoder/decoder compression state.
#[derive(Debug, Clone)]
pub struct EncodingContext {
    table: VecDeque<Entry>,
    size: usize,
    limit: usize,
    refset: Vec<RefEntry>,
}

impl EncodingContext {
    /// Create a context with the given table size limit.
    pub fn new(limit: usize) -> Self {
        Self {
            table: VecDeque::new(),
            size: 0,
            limit,
            refset: Vec::new(),
        }
    }

    /// Number of dynamic entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when the dynamic table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Cumulative cost of the dynamic entries.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current table size limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Dynamic entry at a zero-based index.
    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.table.get(index)
    }

    /// The reference set, in insertion order.
    pub fn refset(&self) -> &[RefEntry] {
        &self.refset
    }

    /// Resolve a combined-space index to (name, value, is_static).
    pub fn dereference(&self, index: usize) -> Result<(Vec<u8>, Vec<u8>, bool)> {
        if let Some(entry) = self.table.get(index) {
            return Ok((entry.name.clone(), entry.value.clone(), false));
        }
        match static_table::get(index - self.table.len()) {
            Some((name, value)) => Ok((name.to_vec(), value.to_vec(), true)),
            None => Err(Error::compression("Index too large")),
        }
    }

    /// Combined-space index of an exact (name, value) match, preferring
    /// the dynamic table.
    pub fn find(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        if let Some(pos) = self
            .table
            .iter()
            .position(|e| e.name == name && e.value == value)
        {
            return Some(pos);
        }
        static_table::find(name, value).map(|pos| self.table.len() + pos)
    }

    /// Combined-space index of the first entry with this name.
    pub fn find_name(&self, name: &[u8]) -> Option<usize> {
        if let Some(pos) = self.table.iter().position(|e| e.name == name) {
            return Some(pos);
        }
        static_table::find_by_name(name).map(|pos| self.table.len() + pos)
    }

    /// Change the table size limit directly (a local SETTINGS
    /// application rather than a wire representation), evicting as
    /// needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        while self.size > self.limit {
            self.evict_last();
        }
    }

    /// Clear all reference-set marks.
    pub fn unmark(&mut self) {
        for r in &mut self.refset {
            r.mark = Mark::Unmarked;
        }
    }

    /// Find the reference-set position whose table entry matches the
    /// header exactly.
    pub fn refset_position(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.refset.iter().position(|r| {
            self.table
                .get(r.index)
                .is_some_and(|e| e.name == name && e.value == value)
        })
    }

    /// Set a reference-set mark by position.
    pub fn set_mark(&mut self, position: usize, mark: Mark) {
        self.refset[position].mark = mark;
    }

    /// Dynamic indices that inserting an entry of `cost` would evict,
    /// tail first. Empty when the entry exceeds the limit outright (the
    /// whole table is dropped instead, which clears the refset anyway).
    pub fn pending_evictions(&self, cost: usize) -> Vec<usize> {
        if cost > self.limit {
            return (0..self.table.len()).rev().collect();
        }
        let mut evicted = Vec::new();
        let mut size = self.size;
        let mut index = self.table.len();
        while size + cost > self.limit && index > 0 {
            index -= 1;
            size -= self.table[index].cost();
            evicted.push(index);
        }
        evicted
    }

    /// Dynamic indices a new size limit would evict, tail first.
    pub fn pending_evictions_for_limit(&self, limit: usize) -> Vec<usize> {
        let mut evicted = Vec::new();
        let mut size = self.size;
        let mut index = self.table.len();
        while size > limit && index > 0 {
            index -= 1;
            size -= self.table[index].cost();
            evicted.push(index);
        }
        evicted
    }

    /// Insert an entry at index 0, evicting from the tail until it
    /// fits. Returns the new entry's index, or `None` when the entry
    /// exceeds the limit by itself (the table is cleared and the entry
    /// is not added). Refset indices referencing evicted entries are
    /// dropped; the rest shift right by one.
    pub fn add_to_table(&mut self, entry: Entry) -> Option<usize> {
        let cost = entry.cost();
        if cost > self.limit {
            trace!(cost, limit = self.limit, "entry exceeds table limit, clearing");
            self.table.clear();
            self.size = 0;
            self.refset.clear();
            return None;
        }
        while self.size + cost > self.limit {
            self.evict_last();
        }
        self.table.push_front(entry);
        self.size += cost;
        for r in &mut self.refset {
            r.index += 1;
        }
        Some(0)
    }

    fn evict_last(&mut self) {
        if let Some(entry) = self.table.pop_back() {
            let index = self.table.len();
            self.size -= entry.cost();
            self.refset.retain(|r| r.index != index);
        }
    }

    /// Apply one representation to the shared state, producing the
    /// header it emits, if any.
    pub fn process(&mut self, command: &Command) -> Result<Option<Header>> {
        match command {
            Command::RefsetEmpty => {
                self.refset.clear();
                Ok(None)
            }
            Command::ChangeTableSize(limit) => {
                self.set_limit(*limit);
                Ok(None)
            }
            Command::Indexed(index) => {
                if let Some(pos) = self.refset.iter().position(|r| r.index == *index) {
                    // Toggle off: the entry leaves the reference set.
                    self.refset.remove(pos);
                    return Ok(None);
                }
                let (name, value, is_static) = self.dereference(*index)?;
                if is_static {
                    if self
                        .add_to_table(Entry::new(name.clone(), value.clone()))
                        .is_some()
                    {
                        self.refset.push(RefEntry {
                            index: 0,
                            mark: Mark::Emitted,
                        });
                    }
                } else {
                    self.refset.push(RefEntry {
                        index: *index,
                        mark: Mark::Emitted,
                    });
                }
                Ok(Some((name, value)))
            }
            Command::Incremental { name, value } => {
                let name = self.resolve_name(name)?;
                if self
                    .add_to_table(Entry::new(name.clone(), value.clone()))
                    .is_some()
                {
                    self.refset.push(RefEntry {
                        index: 0,
                        mark: Mark::Emitted,
                    });
                }
                Ok(Some((name, value.clone())))
            }
            Command::NoIndex { name, value } | Command::NeverIndexed { name, value } => {
                let name = self.resolve_name(name)?;
                Ok(Some((name, value.clone())))
            }
        }
    }

    fn resolve_name(&self, name: &Name) -> Result<Vec<u8>> {
        match name {
            Name::Index(index) => Ok(self.dereference(*index)?.0),
            Name::Literal(bytes) => Ok(bytes.clone()),
        }
    }
}
