use std::iter::FusedIterator;

use super::{Node, NodeAllocator};
use crate::alloc::{Allocator, Slot};

/// Forward iterator over a [`List`](super::List), walking `next` handles
/// from the first node.
pub struct Iter<'a, T: 'a, A: Allocator<Value = T>> {
    nodes: &'a NodeAllocator<T, A>,
    next: Option<&'a Slot>,
    remaining: usize,
}

impl<'a, T, A: Allocator<Value = T>> Iter<'a, T, A> {
    pub(super) fn new(
        nodes: &'a NodeAllocator<T, A>,
        root: Option<&'a Slot>,
        len: usize,
    ) -> Self {
        Self {
            nodes,
            next: root,
            remaining: len,
        }
    }
}

impl<'a, T, A: Allocator<Value = T>> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let nodes = self.nodes;
        let slot = self.next.take()?;
        let node: &'a Node<T> = nodes.get(slot)?;
        self.next = node.next.as_ref();
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, A: Allocator<Value = T>> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: Allocator<Value = T>> FusedIterator for Iter<'_, T, A> {}

impl<T, A: Allocator<Value = T>> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
            remaining: self.remaining,
        }
    }
}
