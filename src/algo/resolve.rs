//! Offset-based classification (resolving phase).
//!
//! Turns matched records into inserts, deletes, updates and moves.
//!
//! # Offset rule
//!
//! A matched element at new position `i` coming from old position `o` is
//! expected at
//!
//! ```text
//! o - deletes_before(o) + inserts_before(i)
//! ```
//!
//! Only when that differs from `i` is a move reported, so an element shifted
//! purely by surrounding deletes and inserts is not a move.
//!
//! The same walk serves flat and sectioned results; [`Coordinates`] maps raw
//! positions into the caller's coordinate space.

use std::hash::Hash;

use crate::changeset::{Changeset, IndexPath, Move, Operations};
use crate::error::{ListDiffError, ListDiffResult};

use super::table::SymbolTable;

// =============================================================================
// Coordinates
// =============================================================================

/// Maps raw old/new positions into result coordinates.
pub(crate) trait Coordinates {
    /// Result coordinate type
    type Pos: Ord + Copy;

    fn old_pos(&self, index: usize) -> Self::Pos;

    fn new_pos(&self, index: usize) -> Self::Pos;
}

/// Plain integer positions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flat;

impl Coordinates for Flat {
    type Pos = usize;

    #[inline]
    fn old_pos(&self, index: usize) -> usize {
        index
    }

    #[inline]
    fn new_pos(&self, index: usize) -> usize {
        index
    }
}

/// Positions inside one section per side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sections {
    pub from: usize,
    pub to: usize,
}

impl Coordinates for Sections {
    type Pos = IndexPath;

    #[inline]
    fn old_pos(&self, index: usize) -> IndexPath {
        IndexPath::new(self.from, index)
    }

    #[inline]
    fn new_pos(&self, index: usize) -> IndexPath {
        IndexPath::new(self.to, index)
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Classify matched records into a changeset.
pub(crate) fn resolve<K, C>(table: &SymbolTable<K>, coords: &C) -> ListDiffResult<Changeset<K, C::Pos>>
where
    K: Hash + Eq + Clone,
    C: Coordinates,
{
    let old_count = table.old_records.len();
    let new_count = table.new_records.len();
    let mut ops = Operations::default();

    // Deletes, and how many precede each old position
    let mut delete_offsets = Vec::with_capacity(old_count);
    let mut running = 0usize;
    for (i, record) in table.old_records.iter().enumerate() {
        delete_offsets.push(running);
        if record.index.is_none() {
            ops.deletes.insert(coords.old_pos(i));
            running += 1;
        }
        ops.old_map.insert(table.entry(record.entry).id.clone(), coords.old_pos(i));
    }

    // Inserts, updates and moves
    let mut running = 0usize;
    for (i, record) in table.new_records.iter().enumerate() {
        let entry = table.entry(record.entry);
        match record.index {
            Some(old_index) => {
                if entry.updated {
                    ops.record_update(coords.old_pos(old_index), coords.new_pos(i));
                }

                let expected = old_index - delete_offsets[old_index] + running;
                if expected != i {
                    ops.moves.push(Move::new(coords.old_pos(old_index), coords.new_pos(i)));
                }
            }
            None => {
                ops.inserts.insert(coords.new_pos(i));
                running += 1;
            }
        }
        ops.new_map.insert(entry.id.clone(), coords.new_pos(i));
    }

    if old_count + ops.inserts.len() != new_count + ops.deletes.len() {
        debug_assert!(false, "conservation violated");
        tracing::error!(
            old_count,
            new_count,
            inserts = ops.inserts.len(),
            deletes = ops.deletes.len(),
            "conservation violated"
        );
        return Err(ListDiffError::Conservation {
            old_count,
            new_count,
            inserts: ops.inserts.len(),
            deletes: ops.deletes.len(),
        });
    }

    Ok(Changeset::from_operations(ops, old_count, new_count))
}
