//! Symbol table construction (indexing phase).
//!
//! Builds one [`Entry`] per distinct identity and one [`Record`] per element.
//! Entries live in an arena and records refer to them by [`EntryId`], so the
//! same entry is reachable from both the old and the new side without shared
//! mutable references.
//!
//! # Position stacks
//!
//! ```text
//! new = [a, a]          push None, None
//! old = [a, x, a, a]    push 3, 2, 0   (reverse order)
//!
//! stack(a) = [None, None, 3, 2, 0]      top = 0
//! ```
//!
//! Popping then yields old positions in ascending order, followed by `None`
//! once the new side has more occurrences than the old side.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::diffable::Diffable;

/// Inline capacity of a position stack before it spills to the heap.
const INLINE_POSITIONS: usize = 4;

/// Dense index into the entry arena of a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryId(u32);

impl EntryId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Aggregation record for one distinct identity.
#[derive(Debug)]
pub(crate) struct Entry<K> {
    /// The identity itself, kept for the result lookup maps
    pub id: K,
    /// Occurrences in the new sequence
    pub new_count: usize,
    /// Occurrences in the old sequence
    pub old_count: usize,
    /// LIFO stack of old positions (`None` for new-side occurrences)
    pub old_indexes: SmallVec<[Option<usize>; INLINE_POSITIONS]>,
    /// Set once a paired occurrence compared unequal
    pub updated: bool,
}

impl<K> Entry<K> {
    fn new(id: K) -> Self {
        Self {
            id,
            new_count: 0,
            old_count: 0,
            old_indexes: SmallVec::new(),
            updated: false,
        }
    }

    /// Whether the identity appears in both sequences.
    #[inline]
    pub fn occurs_on_both_sides(&self) -> bool {
        self.new_count > 0 && self.old_count > 0
    }
}

/// Positional record: one per element on either side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record {
    /// Aggregation record of this element's identity
    pub entry: EntryId,
    /// Matched position on the opposite side
    pub index: Option<usize>,
}

impl Record {
    #[inline]
    fn unmatched(entry: EntryId) -> Self {
        Self { entry, index: None }
    }
}

/// Identity table plus per-element records for both sequences.
#[derive(Debug)]
pub(crate) struct SymbolTable<K> {
    entries: Vec<Entry<K>>,
    pub old_records: Vec<Record>,
    pub new_records: Vec<Record>,
}

impl<K> SymbolTable<K> {
    #[inline]
    pub fn entry(&self, id: EntryId) -> &Entry<K> {
        &self.entries[id.index()]
    }

    #[inline]
    pub fn entry_mut(&mut self, id: EntryId) -> &mut Entry<K> {
        &mut self.entries[id.index()]
    }

    /// Number of distinct identities.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Interns identities into the entry arena.
struct TableBuilder<K> {
    lookup: FxHashMap<K, EntryId>,
    entries: Vec<Entry<K>>,
}

impl<K: Hash + Eq + Clone> TableBuilder<K> {
    fn with_capacity(capacity: usize) -> Self {
        let mut lookup = FxHashMap::default();
        lookup.reserve(capacity);
        Self {
            lookup,
            entries: Vec::with_capacity(capacity),
        }
    }

    fn intern(&mut self, id: K) -> EntryId {
        let entries = &mut self.entries;
        *self.lookup.entry(id).or_insert_with_key(|id| {
            let entry_id = EntryId(entries.len() as u32);
            entries.push(Entry::new(id.clone()));
            entry_id
        })
    }
}

/// Index both sequences: forward over `new`, then backward over `old`.
pub(crate) fn build<T: Diffable>(old: &[T], new: &[T]) -> SymbolTable<T::Id> {
    let mut builder = TableBuilder::with_capacity(new.len().max(old.len()));

    // Pass 1: new, forward
    let mut new_records = Vec::with_capacity(new.len());
    for item in new {
        let entry_id = builder.intern(item.diff_identifier());
        let entry = &mut builder.entries[entry_id.index()];
        entry.new_count += 1;
        entry.old_indexes.push(None);
        new_records.push(Record::unmatched(entry_id));
    }

    // Pass 2: old, reverse
    let mut old_records = Vec::with_capacity(old.len());
    for (i, item) in old.iter().enumerate().rev() {
        let entry_id = builder.intern(item.diff_identifier());
        let entry = &mut builder.entries[entry_id.index()];
        entry.old_count += 1;
        entry.old_indexes.push(Some(i));
        old_records.push(Record::unmatched(entry_id));
    }
    old_records.reverse();

    SymbolTable {
        entries: builder.entries,
        old_records,
        new_records,
    }
}
