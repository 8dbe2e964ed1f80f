//! ## bumplist-core::alloc::slot
//! **Handles to allocated storage**
//!
//! A [`Slot`] names a block of cells inside one allocator instead of
//! pointing at memory. It is neither `Clone` nor `Copy`, and
//! [`Allocator::deallocate`](super::Allocator::deallocate) consumes it, so a
//! block cannot be touched through its handle once it has been released.

use std::fmt;

/// Handle to a block of `len` contiguous cells issued by an allocator.
#[must_use = "dropping a slot without deallocating it leaks its storage"]
#[derive(Debug, PartialEq, Eq)]
pub struct Slot {
    /// First cell of the block (arena: element offset; system: block key).
    pub(crate) index: usize,
    /// Number of cells in the block.
    pub(crate) len: usize,
    /// Generation of the storage the block was carved from.
    pub(crate) epoch: u32,
}

impl Slot {
    #[inline]
    pub(crate) fn new(index: usize, len: usize, epoch: u32) -> Self {
        Self { index, len, epoch }
    }

    /// Non-owning copy of this handle, for internal back references.
    ///
    /// The alias must never be passed to `deallocate`.
    #[inline]
    pub(crate) fn alias(&self) -> Self {
        Self {
            index: self.index,
            len: self.len,
            epoch: self.epoch,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Whether the cell range of `self` overlaps that of `other`.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.epoch == other.epoch
            && !self.is_empty()
            && !other.is_empty()
            && self.index < other.index + other.len
            && other.index < self.index + self.len
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Slot(idx={}, len={}, epoch={})",
            self.index, self.len, self.epoch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_matches_original() {
        let slot = Slot::new(4, 2, 1);
        assert_eq!(slot.alias(), slot);
    }

    #[test]
    fn adjacent_blocks_do_not_overlap() {
        let a = Slot::new(0, 3, 1);
        let b = Slot::new(3, 2, 1);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn overlapping_blocks_detected() {
        let a = Slot::new(0, 3, 1);
        let b = Slot::new(2, 2, 1);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn different_epochs_never_overlap() {
        let a = Slot::new(0, 3, 1);
        let b = Slot::new(0, 3, 2);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn empty_slot() {
        let slot = Slot::new(7, 0, 0);
        assert!(slot.is_empty());
        assert!(!slot.overlaps(&Slot::new(0, 10, 0)));
    }
}
