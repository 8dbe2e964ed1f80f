//! ## bumplist-core::alloc::arena
//! **Fixed-capacity bump allocator**
//!
//! The arena serves every request from one buffer of exactly `capacity`
//! elements. The buffer is acquired on the first non-empty allocation and
//! released as soon as the cursor returns to zero.
//!
//! ```text
//!   base ─► ┌────┬────┬────┬──────────────────┐
//!           │ A1 │ A2 │ A3 │      free        │
//!           └────┴────┴────┴──────────────────┘
//!                          ▲                  ▲
//!                        offset            capacity
//! ```
//!
//! Deallocation only moves the cursor back by `n`; no freed range is reused
//! before the cursor reaches zero. Deallocating in reverse allocation order
//! keeps the cursor meaningful. Any other order still nets to zero once
//! every block is returned, but holes are never filled in between.

use std::any::type_name;
use std::fmt;
use std::mem::size_of;

use bumplist_telemetry::{AllocEvent, AllocOp, NullSink, TraceSink};
use tracing::{debug, trace};

use super::heap::{self, Cells};
use super::{AllocStats, Allocator, Slot};
use crate::error::AllocError;

/// Bump allocator over a lazily acquired buffer of `capacity` elements.
///
/// Accounting is kept in elements; byte figures are derived from
/// `size_of::<T>()`. The buffer is present iff `offset > 0`.
pub struct ArenaAllocator<T, S = NullSink> {
    capacity: usize,
    base: Option<Cells<T>>,
    offset: usize,
    /// Bumped on every buffer acquisition.
    epoch: u32,
    sink: S,
    stats: AllocStats,
}

impl<T> ArenaAllocator<T, NullSink> {
    /// Creates an untraced arena with room for `capacity` elements.
    pub fn new(capacity: usize) -> Self {
        Self::with_sink(capacity, NullSink)
    }
}

impl<T, S: TraceSink> ArenaAllocator<T, S> {
    pub fn with_sink(capacity: usize, sink: S) -> Self {
        Self {
            capacity,
            base: None,
            offset: 0,
            epoch: 0,
            sink,
            stats: AllocStats::new(),
        }
    }

    /// Capacity in elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Elements allocated so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Elements that can still be allocated.
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity.saturating_mul(size_of::<T>())
    }

    pub fn offset_bytes(&self) -> usize {
        self.offset * size_of::<T>()
    }

    /// Whether the buffer is currently held.
    pub fn is_acquired(&self) -> bool {
        self.base.is_some()
    }

    /// Generation of the current (or most recent) buffer.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    fn trace(&self, op: AllocOp, count: usize) {
        self.sink
            .record(&AllocEvent::new(op, type_name::<T>(), count));
    }

    fn cell_position(&self, slot: &Slot, index: usize) -> Option<usize> {
        if slot.epoch != self.epoch || index >= slot.len {
            return None;
        }
        Some(slot.index + index)
    }

    fn cell(&self, slot: &Slot, index: usize) -> Option<&Option<T>> {
        let pos = self.cell_position(slot, index)?;
        self.base.as_ref()?.get(pos)
    }

    fn cell_mut(&mut self, slot: &Slot, index: usize) -> Option<&mut Option<T>> {
        let pos = self.cell_position(slot, index)?;
        self.base.as_mut()?.get_mut(pos)
    }

    fn acquire(&mut self) -> Result<(), AllocError> {
        let Some(buffer) = heap::acquire::<T>(self.capacity) else {
            return Err(AllocError::out_of_memory::<T>("arena", self.capacity));
        };
        self.base = Some(buffer);
        self.epoch = self.epoch.wrapping_add(1);
        self.stats.increment_acquisitions();
        trace!(
            capacity = self.capacity,
            bytes = self.capacity_bytes(),
            epoch = self.epoch,
            "Acquired arena buffer"
        );
        Ok(())
    }
}

impl<T, S: TraceSink> Allocator for ArenaAllocator<T, S> {
    type Value = T;
    type Rebind<U> = ArenaAllocator<U, S>;

    /// Bumps the cursor by `n` elements.
    ///
    /// Fails with `OutOfMemory`, leaving the cursor and buffer untouched,
    /// when fewer than `n` elements remain. A zero-length request never
    /// acquires the buffer.
    fn allocate(&mut self, n: usize) -> Result<Slot, AllocError> {
        self.trace(AllocOp::Allocate, n);

        let end = match self.offset.checked_add(n) {
            Some(end) if end <= self.capacity => end,
            _ => {
                self.stats.increment_failures();
                self.trace(AllocOp::Refuse, n);
                debug!(
                    n,
                    offset = self.offset,
                    capacity = self.capacity,
                    "Arena capacity exceeded"
                );
                return Err(AllocError::out_of_memory::<T>("arena", n));
            }
        };

        if n == 0 {
            return Ok(Slot::new(self.offset, 0, self.epoch));
        }

        if self.base.is_none() {
            if let Err(err) = self.acquire() {
                self.stats.increment_failures();
                self.trace(AllocOp::Refuse, n);
                return Err(err);
            }
        }

        let slot = Slot::new(self.offset, n, self.epoch);
        self.offset = end;
        self.stats.increment_allocations(n);
        Ok(slot)
    }

    /// Moves the cursor back by `n` elements, releasing the buffer when it
    /// reaches zero.
    ///
    /// The cells named by `slot` are emptied, dropping anything still
    /// constructed there. Without a buffer this is a no-op. `n` larger than
    /// the cursor clamps to zero.
    fn deallocate(&mut self, slot: Slot, n: usize) {
        self.trace(AllocOp::Deallocate, n);
        self.stats.increment_deallocations(n);

        let Some(base) = self.base.as_mut() else {
            return;
        };
        // Freed cells must not leak their values into the next block handed
        // out over the same range.
        if slot.epoch == self.epoch {
            let end = slot.index.saturating_add(slot.len).min(base.len());
            if let Some(cells) = base.get_mut(slot.index..end) {
                cells.iter_mut().for_each(|cell| drop(cell.take()));
            }
        }
        drop(slot);

        self.offset = self.offset.saturating_sub(n);
        if self.offset == 0 {
            self.base = None;
            self.stats.increment_releases();
            trace!(epoch = self.epoch, "Released arena buffer");
        }
    }

    fn construct_at(&mut self, slot: &Slot, index: usize, value: T) {
        self.trace(AllocOp::Construct, 1);
        match self.cell_mut(slot, index) {
            Some(cell) => *cell = Some(value),
            None => panic!("construct into cell {index} of {slot}, which is not live"),
        }
    }

    fn destroy_at(&mut self, slot: &Slot, index: usize) -> Option<T> {
        self.trace(AllocOp::Destroy, 1);
        self.cell_mut(slot, index)?.take()
    }

    fn get_at(&self, slot: &Slot, index: usize) -> Option<&T> {
        self.cell(slot, index)?.as_ref()
    }

    fn get_at_mut(&mut self, slot: &Slot, index: usize) -> Option<&mut T> {
        self.cell_mut(slot, index)?.as_mut()
    }

    fn rebind<U>(&self) -> ArenaAllocator<U, S> {
        ArenaAllocator::with_sink(self.capacity, self.sink.clone())
    }

    fn fresh(&self) -> Self {
        Self::with_sink(self.capacity, self.sink.clone())
    }

    fn stats(&self) -> &AllocStats {
        &self.stats
    }
}

impl<T, S> fmt::Debug for ArenaAllocator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("type_name", &type_name::<T>())
            .field("capacity", &self.capacity)
            .field("offset", &self.offset)
            .field("acquired", &self.base.is_some())
            .field("epoch", &self.epoch)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumplist_telemetry::RecordingSink;

    #[test]
    fn buffer_is_acquired_lazily() {
        let mut arena = ArenaAllocator::<u32>::new(4);
        assert!(!arena.is_acquired());
        assert_eq!(arena.stats().acquisitions(), 0);

        let slot = arena.allocate(1).unwrap();
        assert!(arena.is_acquired());
        assert_eq!(arena.stats().acquisitions(), 1);
        arena.deallocate(slot, 1);
    }

    #[test]
    fn sequential_blocks_are_contiguous() {
        let mut arena = ArenaAllocator::<u64>::new(10);
        let a = arena.allocate(3).unwrap();
        let b = arena.allocate(2).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 3);
        assert_eq!(arena.offset(), 5);
        assert_eq!(arena.offset_bytes(), 5 * 8);
        assert_eq!(arena.remaining(), 5);

        arena.deallocate(b, 2);
        arena.deallocate(a, 3);
    }

    #[test]
    fn exact_capacity_fits() {
        let mut arena = ArenaAllocator::<u8>::new(8);
        let slot = arena.allocate(8).unwrap();
        assert_eq!(arena.remaining(), 0);
        arena.deallocate(slot, 8);
    }

    #[test]
    fn over_capacity_leaves_state_unchanged() {
        let mut arena = ArenaAllocator::<i32>::new(4);
        let slot = arena.allocate(3).unwrap();
        let epoch = arena.epoch();

        let err = arena.allocate(2).unwrap_err();
        assert_eq!(
            err,
            AllocError::OutOfMemory {
                strategy: "arena",
                requested: 8,
            }
        );
        assert_eq!(arena.offset(), 3);
        assert!(arena.is_acquired());
        assert_eq!(arena.epoch(), epoch);
        assert_eq!(arena.stats().failures(), 1);

        arena.deallocate(slot, 3);
    }

    #[test]
    fn oversized_first_request_never_acquires() {
        let mut arena = ArenaAllocator::<i32>::new(2);
        assert!(arena.allocate(3).is_err());
        assert!(!arena.is_acquired());
        assert_eq!(arena.stats().acquisitions(), 0);
    }

    #[test]
    fn overflowing_request_is_out_of_memory() {
        let mut arena = ArenaAllocator::<i32>::new(2);
        let slot = arena.allocate(1).unwrap();
        assert!(arena.allocate(usize::MAX).is_err());
        assert_eq!(arena.offset(), 1);
        arena.deallocate(slot, 1);
    }

    #[test]
    fn release_when_cursor_returns_to_zero() {
        let mut arena = ArenaAllocator::<u16>::new(4);
        let a = arena.allocate(1).unwrap();
        let b = arena.allocate(2).unwrap();

        arena.deallocate(b, 2);
        assert!(arena.is_acquired());
        arena.deallocate(a, 1);
        assert!(!arena.is_acquired());
        assert_eq!(arena.offset(), 0);
        assert_eq!(arena.stats().releases(), 1);
    }

    #[test]
    fn reacquires_fresh_buffer_after_release() {
        let mut arena = ArenaAllocator::<u16>::new(4);
        let first = arena.allocate(2).unwrap();
        arena.construct(&first, 11);
        let stale = first.alias();
        arena.deallocate(first, 2);

        let second = arena.allocate(1).unwrap();
        assert_eq!(arena.stats().acquisitions(), 2);
        assert_ne!(second.epoch(), stale.epoch());
        assert_eq!(second.index(), stale.index());
        assert_eq!(arena.get(&stale), None);
        assert_eq!(arena.get(&second), None);
        arena.deallocate(second, 1);
    }

    #[test]
    fn freed_cells_do_not_reappear_in_next_block() {
        let mut arena = ArenaAllocator::<&str>::new(4);
        let kept = arena.allocate(1).unwrap();
        let freed = arena.allocate(1).unwrap();
        arena.construct(&freed, "released");
        arena.deallocate(freed, 1);

        let reused = arena.allocate(1).unwrap();
        assert_eq!(arena.stats().acquisitions(), 1);
        assert_eq!(arena.get(&reused), None);
        arena.deallocate(reused, 1);
        arena.deallocate(kept, 1);
    }

    #[test]
    fn deallocate_drops_values_left_in_block() {
        use std::rc::Rc;

        let shared = Rc::new(7u32);
        let mut arena = ArenaAllocator::<Rc<u32>>::new(4);
        let kept = arena.allocate(1).unwrap();
        let freed = arena.allocate(2).unwrap();
        arena.construct_at(&freed, 1, Rc::clone(&shared));
        assert_eq!(Rc::strong_count(&shared), 2);

        // Out of stack order: the earlier block goes first.
        arena.deallocate(kept, 1);
        assert_eq!(Rc::strong_count(&shared), 2);
        arena.deallocate(freed, 2);
        assert_eq!(Rc::strong_count(&shared), 1);
        assert!(!arena.is_acquired());
    }

    #[test]
    fn deallocate_without_buffer_is_noop() {
        let mut arena = ArenaAllocator::<u8>::new(4);
        let empty = arena.allocate(0).unwrap();
        arena.deallocate(empty, 3);
        assert_eq!(arena.offset(), 0);
        assert!(!arena.is_acquired());
        assert_eq!(arena.stats().releases(), 0);
    }

    #[test]
    fn zero_length_allocation_does_not_acquire() {
        let mut arena = ArenaAllocator::<u8>::new(4);
        let slot = arena.allocate(0).unwrap();
        assert!(slot.is_empty());
        assert!(!arena.is_acquired());
        arena.deallocate(slot, 0);
    }

    #[test]
    fn out_of_order_deallocation_nets_to_zero() {
        let mut arena = ArenaAllocator::<u32>::new(6);
        let a = arena.allocate(1).unwrap();
        let b = arena.allocate(2).unwrap();
        let c = arena.allocate(3).unwrap();

        arena.deallocate(a, 1);
        assert_eq!(arena.offset(), 5);
        // Freed space is not reusable: only one element fits again.
        assert!(arena.allocate(2).is_err());

        arena.deallocate(c, 3);
        arena.deallocate(b, 2);
        assert_eq!(arena.offset(), 0);
        assert!(!arena.is_acquired());
    }

    #[test]
    fn construct_and_destroy_do_not_move_cursor() {
        let mut arena = ArenaAllocator::<String>::new(2);
        let slot = arena.allocate(2).unwrap();
        arena.construct_at(&slot, 1, "tail".to_string());
        assert_eq!(arena.offset(), 2);
        assert_eq!(arena.get_at(&slot, 1).map(String::as_str), Some("tail"));
        assert_eq!(arena.get_at(&slot, 0), None);

        assert_eq!(arena.destroy_at(&slot, 1).as_deref(), Some("tail"));
        assert_eq!(arena.offset(), 2);
        arena.deallocate(slot, 2);
    }

    #[test]
    fn zero_sized_elements_follow_element_accounting() {
        let mut arena = ArenaAllocator::<()>::new(2);
        let a = arena.allocate(2).unwrap();
        assert!(arena.is_acquired());
        assert_eq!(arena.offset_bytes(), 0);
        assert!(arena.allocate(1).is_err());
        arena.deallocate(a, 2);
        assert!(!arena.is_acquired());
    }

    #[test]
    fn refused_request_is_traced_after_allocate() {
        let sink = RecordingSink::new();
        let mut arena = ArenaAllocator::<u8, _>::with_sink(1, sink.clone());
        let held = arena.allocate(1).unwrap();
        assert!(arena.allocate(5).is_err());

        assert_eq!(
            sink.ops(),
            vec![AllocOp::Allocate, AllocOp::Allocate, AllocOp::Refuse]
        );
        assert_eq!(sink.events()[2].count, 5);
        arena.deallocate(held, 1);
    }

    #[test]
    fn rebind_is_independent_with_same_capacity() {
        let sink = RecordingSink::new();
        let mut ints = ArenaAllocator::<i32, _>::with_sink(3, sink.clone());
        let mut bytes = ints.rebind::<u8>();
        assert_eq!(bytes.capacity(), 3);

        let a = ints.allocate(3).unwrap();
        let b = bytes.allocate(3).unwrap();
        assert_eq!(ints.remaining(), 0);
        assert_eq!(bytes.remaining(), 0);
        assert_eq!(sink.count(AllocOp::Allocate), 2);

        bytes.deallocate(b, 3);
        assert!(ints.is_acquired());
        ints.deallocate(a, 3);
    }

    #[test]
    #[should_panic]
    fn construct_into_stale_slot_panics() {
        let mut arena = ArenaAllocator::<u8>::new(1);
        let slot = arena.allocate(1).unwrap();
        let stale = slot.alias();
        arena.deallocate(slot, 1);
        arena.construct(&stale, 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn allocations_within_capacity_share_one_buffer(
                sizes in proptest::collection::vec(1usize..8, 1..20),
            ) {
                let capacity: usize = sizes.iter().sum();
                let mut arena = ArenaAllocator::<u64>::new(capacity);
                let mut slots = Vec::new();
                for &n in &sizes {
                    slots.push(arena.allocate(n).unwrap());
                }

                prop_assert_eq!(arena.stats().acquisitions(), 1);
                for (i, a) in slots.iter().enumerate() {
                    prop_assert!(a.index() + a.len() <= capacity);
                    for b in &slots[i + 1..] {
                        prop_assert!(!a.overlaps(b));
                    }
                }

                while let Some(slot) = slots.pop() {
                    let n = slot.len();
                    arena.deallocate(slot, n);
                }
                prop_assert!(!arena.is_acquired());
            }

            #[test]
            fn net_zero_sequences_release_the_buffer(
                ops in proptest::collection::vec((any::<bool>(), 1usize..4), 1..40),
            ) {
                let mut arena = ArenaAllocator::<u32>::new(16);
                let mut live: Vec<Slot> = Vec::new();
                for (push, n) in ops {
                    if push || live.is_empty() {
                        if let Ok(slot) = arena.allocate(n) {
                            live.push(slot);
                        }
                    } else if let Some(slot) = live.pop() {
                        let n = slot.len();
                        arena.deallocate(slot, n);
                    }
                    prop_assert!(arena.offset() <= arena.capacity());
                    prop_assert_eq!(arena.is_acquired(), arena.offset() > 0);
                }

                while let Some(slot) = live.pop() {
                    let n = slot.len();
                    arena.deallocate(slot, n);
                }
                prop_assert_eq!(arena.offset(), 0);
                prop_assert!(!arena.is_acquired());

                let releases = arena.stats().releases();
                let slot = arena.allocate(1).unwrap();
                prop_assert!(arena.is_acquired());
                prop_assert_eq!(arena.stats().acquisitions(), releases + 1);
                arena.deallocate(slot, 1);
            }

            #[test]
            fn failed_allocation_leaves_cursor(
                filled in 0usize..8,
                extra in 1usize..8,
            ) {
                let mut arena = ArenaAllocator::<u8>::new(8);
                let held = arena.allocate(filled).unwrap();
                let before = (arena.offset(), arena.is_acquired(), arena.epoch());
                let request = 8 - filled + extra;
                prop_assert!(arena.allocate(request).is_err());
                prop_assert_eq!(before, (arena.offset(), arena.is_acquired(), arena.epoch()));
                arena.deallocate(held, filled);
            }
        }
    }
}
