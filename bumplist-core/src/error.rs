use thiserror::Error;

/// The single failure an allocator strategy can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("Out of memory: {strategy} allocator cannot serve {requested} bytes")]
    OutOfMemory {
        /// Which strategy refused the request (`"system"` or `"arena"`).
        strategy: &'static str,
        /// Size of the refused request in bytes.
        requested: usize,
    },
}

impl AllocError {
    pub(crate) fn out_of_memory<T>(strategy: &'static str, n: usize) -> Self {
        AllocError::OutOfMemory {
            strategy,
            requested: n.saturating_mul(std::mem::size_of::<T>()),
        }
    }
}
