//! # bumplist-core
//!
//! Pluggable allocation strategies and a linked list built on them.
//!
//! ### Key Submodules:
//! - `alloc`: the [`Allocator`](alloc::Allocator) capability, a pass-through
//!   system allocator (optionally traced) and a fixed-capacity arena
//! - `list`: a singly-linked list whose nodes are allocated through a rebound
//!   allocator
//!
//! Everything here is single-threaded. Allocators report their operations to
//! an injected `bumplist_telemetry::TraceSink`; they never write output
//! themselves.
//!
//! ```
//! use bumplist_core::prelude::*;
//!
//! let mut list = List::new_in(ArenaAllocator::new(10));
//! for i in 0..10 {
//!     list.append(i).unwrap();
//! }
//! assert!(list.append(10).is_err());
//! assert_eq!(list.iter().copied().sum::<i32>(), 45);
//! ```

pub mod alloc;
pub mod error;
pub mod list;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::error::*;
    pub use crate::list::*;
}

pub use error::AllocError;
