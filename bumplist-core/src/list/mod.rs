//! ## bumplist-core::list
//! **Singly-linked list over a pluggable allocator**
//!
//! The list is parameterized by an allocator over its element type `T`,
//! but what it actually allocates are [`Node<T>`]s. It therefore rebinds
//! the user's allocator once at construction and allocates every node
//! through the rebound instance.
//!
//! Nodes are linked by [`Slot`] handles rather than addresses, so the chain
//! stays valid for any strategy that resolves handles, however it lays out
//! its storage.

mod iter;

pub use iter::Iter;

use std::fmt;
use std::mem;

use crate::alloc::{Allocator, Slot, SystemAllocator};
use crate::error::AllocError;

/// A list cell: one element plus the handle of the next node.
pub struct Node<T> {
    value: T,
    next: Option<Slot>,
}

impl<T> Node<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn next(&self) -> Option<&Slot> {
        self.next.as_ref()
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("next", &self.next)
            .finish()
    }
}

/// Node allocator used by a `List<T, A>`.
pub type NodeAllocator<T, A> = <A as Allocator>::Rebind<Node<T>>;

/// Singly-linked list whose nodes come from `A` rebound to `Node<T>`.
///
/// `root` owns the chain; `tail` aliases the last node so that
/// [`List::append`] is O(1).
pub struct List<T, A: Allocator<Value = T> = SystemAllocator<T>> {
    alloc: A,
    nodes: NodeAllocator<T, A>,
    root: Option<Slot>,
    tail: Option<Slot>,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list backed by the untraced system allocator.
    pub fn new() -> Self {
        Self::new_in(SystemAllocator::new())
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator<Value = T>> List<T, A> {
    /// Creates an empty list that allocates its nodes through `alloc`.
    ///
    /// Nothing is allocated until the first [`List::append`].
    pub fn new_in(alloc: A) -> Self {
        let nodes = alloc.rebind::<Node<T>>();
        Self {
            alloc,
            nodes,
            root: None,
            tail: None,
            len: 0,
        }
    }

    /// Builds a list from `values`, stopping at the first allocation
    /// failure.
    pub fn try_from_iter_in<I>(values: I, alloc: A) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new_in(alloc);
        for value in values {
            list.append(value)?;
        }
        Ok(list)
    }

    /// Appends `value` after the last node.
    ///
    /// Allocation failures are returned unchanged and leave the list as it
    /// was.
    pub fn append(&mut self, value: T) -> Result<(), AllocError> {
        let slot = self.nodes.allocate(1)?;
        self.nodes.construct(&slot, Node { value, next: None });

        let new_tail = slot.alias();
        match self.tail.take() {
            None => self.root = Some(slot),
            Some(tail) => {
                let last = self
                    .nodes
                    .get_mut(&tail)
                    .expect("list tail is always a constructed node");
                last.next = Some(slot);
            }
        }
        self.tail = Some(new_tail);
        self.len += 1;
        Ok(())
    }

    /// Forward iterator from the first node; each call starts over.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(&self.nodes, self.root.as_ref(), self.len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn front(&self) -> Option<&T> {
        let root = self.root.as_ref()?;
        self.nodes.get(root).map(Node::value)
    }

    pub fn back(&self) -> Option<&T> {
        let tail = self.tail.as_ref()?;
        self.nodes.get(tail).map(Node::value)
    }

    /// The allocator the list was created with.
    ///
    /// It never allocates on the list's behalf; nodes come from
    /// [`List::node_allocator`].
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn node_allocator(&self) -> &NodeAllocator<T, A> {
        &self.nodes
    }

    /// Moves the whole chain and its allocator state into a new list.
    ///
    /// `self` is left empty, with a fresh node allocator that holds no
    /// storage.
    pub fn take(&mut self) -> Self {
        let empty = Self::new_in(self.alloc.fresh());
        mem::replace(self, empty)
    }

    /// Destroys and deallocates every node, front to back.
    pub fn clear(&mut self) {
        self.tail = None;
        let mut cursor = self.root.take();
        while let Some(slot) = cursor {
            cursor = match self.nodes.destroy(&slot) {
                Some(Node { value, next }) => {
                    drop(value);
                    next
                }
                None => None,
            };
            self.nodes.deallocate(slot, 1);
        }
        self.len = 0;
    }
}

impl<T: Clone, A: Allocator<Value = T>> List<T, A> {
    /// Appends a copy of every element of `other`.
    ///
    /// On `OutOfMemory` the elements appended so far stay in `self`; there
    /// is no rollback.
    pub fn try_extend_from<B>(&mut self, other: &List<T, B>) -> Result<(), AllocError>
    where
        B: Allocator<Value = T>,
    {
        for value in other {
            self.append(value.clone())?;
        }
        Ok(())
    }

    /// Deep copy into a new list that allocates through `alloc`.
    pub fn try_clone_in<B>(&self, alloc: B) -> Result<List<T, B>, AllocError>
    where
        B: Allocator<Value = T>,
    {
        let mut copy = List::new_in(alloc);
        copy.try_extend_from(self)?;
        Ok(copy)
    }

    /// Deep copy into a new list over a fresh allocator of the same kind.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        self.try_clone_in(self.alloc.fresh())
    }
}

impl<T, A: Allocator<Value = T>> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, T, A: Allocator<Value = T>> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, A, B> PartialEq<List<T, B>> for List<T, A>
where
    T: PartialEq,
    A: Allocator<Value = T>,
    B: Allocator<Value = T>,
{
    fn eq(&self, other: &List<T, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug, A: Allocator<Value = T>> fmt::Debug for List<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
