//! ## bumplist-core::alloc::system
//! **Pass-through heap allocator**
//!
//! Each `allocate` obtains a fresh block from the general-purpose heap and
//! each `deallocate` hands it straight back. With a [`TracingSink`] attached
//! this is the logging allocator: one event per operation, no effect on
//! control flow.

use std::any::type_name;
use std::fmt;

use bumplist_telemetry::{AllocEvent, AllocOp, NullSink, TraceSink, TracingSink};
use tracing::debug;

use super::heap::{self, Cells};
use super::{AllocStats, Allocator, Slot};
use crate::error::AllocError;

/// System allocator that logs every operation through `tracing`.
pub type LoggingAllocator<T> = SystemAllocator<T, TracingSink>;

struct Entry<T> {
    epoch: u32,
    cells: Option<Cells<T>>,
}

/// Allocator delegating every block to the heap.
///
/// Live blocks are tracked in a table keyed by [`Slot::index`]. Keys of
/// released blocks are reused, with the entry's epoch bumped so an old
/// handle never resolves to the new block.
pub struct SystemAllocator<T, S = NullSink> {
    blocks: Vec<Entry<T>>,
    vacant: Vec<usize>,
    sink: S,
    stats: AllocStats,
}

impl<T> SystemAllocator<T, NullSink> {
    /// Creates an untraced system allocator.
    pub fn new() -> Self {
        Self::with_sink(NullSink)
    }
}

impl<T> SystemAllocator<T, TracingSink> {
    /// Creates a system allocator that logs every operation.
    pub fn logging() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl<T, S: TraceSink> SystemAllocator<T, S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            blocks: Vec::new(),
            vacant: Vec::new(),
            sink,
            stats: AllocStats::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of blocks currently held from the heap.
    pub fn live_blocks(&self) -> usize {
        self.blocks.iter().filter(|e| e.cells.is_some()).count()
    }

    #[inline]
    fn trace(&self, op: AllocOp, count: usize) {
        self.sink
            .record(&AllocEvent::new(op, type_name::<T>(), count));
    }

    fn cell(&self, slot: &Slot, index: usize) -> Option<&Option<T>> {
        if index >= slot.len {
            return None;
        }
        let entry = self.blocks.get(slot.index)?;
        if entry.epoch != slot.epoch {
            return None;
        }
        entry.cells.as_ref()?.get(index)
    }

    fn cell_mut(&mut self, slot: &Slot, index: usize) -> Option<&mut Option<T>> {
        if index >= slot.len {
            return None;
        }
        let entry = self.blocks.get_mut(slot.index)?;
        if entry.epoch != slot.epoch {
            return None;
        }
        entry.cells.as_mut()?.get_mut(index)
    }
}

impl<T, S: TraceSink> Allocator for SystemAllocator<T, S> {
    type Value = T;
    type Rebind<U> = SystemAllocator<U, S>;

    fn allocate(&mut self, n: usize) -> Result<Slot, AllocError> {
        self.trace(AllocOp::Allocate, n);

        let Some(cells) = heap::acquire::<T>(n) else {
            self.stats.increment_failures();
            self.trace(AllocOp::Refuse, n);
            debug!(n, type_name = type_name::<T>(), "Heap refused block");
            return Err(AllocError::out_of_memory::<T>("system", n));
        };

        let key = match self.vacant.pop() {
            Some(key) => key,
            None => {
                self.blocks.push(Entry {
                    epoch: 0,
                    cells: None,
                });
                self.blocks.len() - 1
            }
        };
        let entry = &mut self.blocks[key];
        entry.epoch = entry.epoch.wrapping_add(1);
        entry.cells = Some(cells);

        self.stats.increment_acquisitions();
        self.stats.increment_allocations(n);
        Ok(Slot::new(key, n, entry.epoch))
    }

    fn deallocate(&mut self, slot: Slot, n: usize) {
        self.trace(AllocOp::Deallocate, n);
        self.stats.increment_deallocations(n);

        let released = self
            .blocks
            .get_mut(slot.index)
            .filter(|entry| entry.epoch == slot.epoch)
            .and_then(|entry| entry.cells.take());
        if released.is_some() {
            self.vacant.push(slot.index);
            self.stats.increment_releases();
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

    fn rebind<U>(&self) -> SystemAllocator<U, S> {
        SystemAllocator::with_sink(self.sink.clone())
    }

    fn fresh(&self) -> Self {
        Self::with_sink(self.sink.clone())
    }

    fn stats(&self) -> &AllocStats {
        &self.stats
    }
}

impl<T, S: TraceSink + Default> Default for SystemAllocator<T, S> {
    fn default() -> Self {
        Self::with_sink(S::default())
    }
}

impl<T, S> fmt::Debug for SystemAllocator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemAllocator")
            .field("type_name", &type_name::<T>())
            .field("blocks", &self.blocks.len())
            .field("vacant", &self.vacant.len())
            .field("stats", &self.stats)
            .finish()
    }
}
