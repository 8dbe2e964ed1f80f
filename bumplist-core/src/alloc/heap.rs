//! General-purpose heap access shared by both strategies.
//!
//! Blocks are requested with `try_reserve_exact`, so exhaustion surfaces as
//! `None` instead of aborting the process.

/// Storage for `n` cells, each empty until constructed into.
pub(crate) type Cells<T> = Box<[Option<T>]>;

/// Obtains `n` empty cells from the heap.
pub(crate) fn acquire<T>(n: usize) -> Option<Cells<T>> {
    let mut cells: Vec<Option<T>> = Vec::new();
    cells.try_reserve_exact(n).ok()?;
    cells.resize_with(n, || None);
    Some(cells.into_boxed_slice())
}
