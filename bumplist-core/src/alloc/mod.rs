//! ## bumplist-core::alloc
//! **The allocator capability and its strategies**
//!
//! ### Key Submodules:
//! - `system/`: pass-through heap allocator with optional tracing
//! - `arena/`: fixed-capacity bump allocator over a lazily acquired buffer
//! - `slot/`: handles naming allocated blocks
//! - `stats/`: per-instance operation counters
//!
//! Containers never see memory addresses. They receive [`Slot`] handles from
//! [`Allocator::allocate`] and read or write cells through the allocator that
//! issued them.

pub mod arena;
mod heap;
pub mod slot;
pub mod stats;
pub mod system;

pub use arena::ArenaAllocator;
pub use slot::Slot;
pub use stats::AllocStats;
pub use system::{LoggingAllocator, SystemAllocator};

use crate::error::AllocError;

/// The capability every allocation strategy provides.
///
/// A strategy is parameterized over one element type ([`Allocator::Value`]).
/// Generic code that needs to allocate a different type (a list allocating
/// nodes that wrap its elements) calls [`Allocator::rebind`] to get an
/// equivalent strategy for that type.
///
/// # Caller obligations
///
/// `deallocate` must receive the same `n` that was passed to `allocate`.
/// Strategies with stack-shaped accounting (see [`ArenaAllocator`]) also
/// expect deallocations to net out in reverse order. Neither is checked at
/// runtime.
pub trait Allocator {
    /// Element type this strategy allocates.
    type Value;

    /// The same strategy over element type `U`.
    type Rebind<U>: Allocator<Value = U>;

    /// Reserves storage for `n` contiguous elements.
    fn allocate(&mut self, n: usize) -> Result<Slot, AllocError>;

    /// Releases a block previously returned by [`Allocator::allocate`].
    ///
    /// Values still constructed in the block are dropped no later than the
    /// storage backing them is returned to the heap.
    fn deallocate(&mut self, slot: Slot, n: usize);

    /// Places `value` into cell `index` of `slot` without allocating.
    ///
    /// A value already in the cell is dropped first.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not live in this allocator or `index` is outside
    /// the block.
    fn construct_at(&mut self, slot: &Slot, index: usize, value: Self::Value);

    /// Moves the value out of cell `index`, leaving the cell empty.
    ///
    /// Dropping the returned value runs its teardown. The storage itself
    /// stays allocated. Returns `None` for an empty or unresolvable cell.
    fn destroy_at(&mut self, slot: &Slot, index: usize) -> Option<Self::Value>;

    fn get_at(&self, slot: &Slot, index: usize) -> Option<&Self::Value>;

    fn get_at_mut(&mut self, slot: &Slot, index: usize) -> Option<&mut Self::Value>;

    /// An allocator of the same kind and configuration over `U`.
    ///
    /// The result owns independent storage: nothing allocated through it is
    /// visible to `self` and vice versa.
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// An empty allocator of the same kind and configuration over the same
    /// element type.
    fn fresh(&self) -> Self
    where
        Self: Sized;

    /// Operation counters for this instance.
    fn stats(&self) -> &AllocStats;

    #[inline]
    fn construct(&mut self, slot: &Slot, value: Self::Value) {
        self.construct_at(slot, 0, value)
    }

    #[inline]
    fn destroy(&mut self, slot: &Slot) -> Option<Self::Value> {
        self.destroy_at(slot, 0)
    }

    #[inline]
    fn get(&self, slot: &Slot) -> Option<&Self::Value> {
        self.get_at(slot, 0)
    }

    #[inline]
    fn get_mut(&mut self, slot: &Slot) -> Option<&mut Self::Value> {
        self.get_at_mut(slot, 0)
    }
}
