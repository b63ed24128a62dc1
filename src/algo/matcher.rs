//! Occurrence pairing (matching phase).
//!
//! Walks the new records in order. Every identity present on both sides pops
//! one position off its stack: a real old position links the two records in
//! both directions and is compared under the [`DiffMode`]; an absent marker
//! leaves the new occurrence unmatched, i.e. an insertion.

use crate::diffable::Diffable;
use crate::error::{ListDiffError, ListDiffResult};

use super::diff::DiffMode;
use super::table::SymbolTable;

/// Pair occurrences and flag content updates.
pub(crate) fn match_records<T: Diffable>(
    table: &mut SymbolTable<T::Id>,
    old: &[T],
    new: &[T],
    mode: DiffMode,
) -> ListDiffResult<()> {
    for i in 0..table.new_records.len() {
        let entry_id = table.new_records[i].entry;
        let entry = table.entry_mut(entry_id);
        if !entry.occurs_on_both_sides() {
            continue;
        }

        let Some(popped) = entry.old_indexes.pop() else {
            debug_assert!(false, "position stack underflow at new index {i}");
            tracing::error!(new_index = i, "position stack underflow");
            return Err(ListDiffError::StackUnderflow { new_index: i });
        };

        let Some(old_index) = popped.filter(|&o| o < old.len()) else {
            continue;
        };

        if !entry.updated && is_updated(&new[i], &old[old_index], mode) {
            entry.updated = true;
        }

        table.new_records[i].index = Some(old_index);
        table.old_records[old_index].index = Some(i);
    }

    Ok(())
}

/// Whether a paired occurrence changed under `mode`.
///
/// Identity mode relies on [`check_mode`](super::diff::check_mode) having
/// rejected elements without an address.
#[inline]
fn is_updated<T: Diffable>(new: &T, old: &T, mode: DiffMode) -> bool {
    let (new_addr, old_addr) = (new.instance_addr(), old.instance_addr());
    match mode {
        DiffMode::Identity => new_addr != old_addr,
        DiffMode::Equality => {
            let same_instance = new_addr.is_some() && new_addr == old_addr;
            !same_instance && !new.is_equal_to_diffable(old)
        }
    }
}
