//! ## bumplist-core::alloc::stats
//! **Per-allocator operation counters**
//!
//! Every allocator instance keeps its own [`AllocStats`]. Rebinding an
//! allocator starts a new, zeroed set of counters because the rebound
//! allocator owns independent storage.

/// Counters for one allocator instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    allocations: usize,
    deallocations: usize,
    failures: usize,
    acquisitions: usize,
    releases: usize,
    live_elements: usize,
}

impl AllocStats {
    /// Creates a new `AllocStats` instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn increment_allocations(&mut self, n: usize) {
        self.allocations += 1;
        self.live_elements += n;
    }

    #[inline]
    pub(crate) fn increment_deallocations(&mut self, n: usize) {
        self.deallocations += 1;
        self.live_elements = self.live_elements.saturating_sub(n);
    }

    #[inline]
    pub(crate) fn increment_failures(&mut self) {
        self.failures += 1;
    }

    /// Counts a heap acquisition (a system block or an arena buffer).
    #[inline]
    pub(crate) fn increment_acquisitions(&mut self) {
        self.acquisitions += 1;
    }

    /// Counts a heap release (a system block or an arena buffer).
    #[inline]
    pub(crate) fn increment_releases(&mut self) {
        self.releases += 1;
    }

    /// Successful `allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// `deallocate` calls, including no-op ones.
    pub fn deallocations(&self) -> usize {
        self.deallocations
    }

    /// `allocate` calls that returned `OutOfMemory`.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Storage acquisitions from the heap.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }

    /// Storage releases back to the heap.
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Elements allocated and not yet deallocated.
    pub fn live_elements(&self) -> usize {
        self.live_elements
    }
}
