// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory doubly linked list
//!
//! Nodes live in an index-addressed arena. Forward links run head to tail and
//! backward links are plain slot indices, so the list never forms reference
//! cycles. Vacated slots go on a free list and are reused by later inserts.
//!
//! The list knows nothing about persistence; see `persisted-storage` for the
//! logged wrapper.

use std::fmt;
use std::iter::FusedIterator;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list with O(1) insertion at either end and O(1) removal at
/// the tail
#[derive(Clone)]
pub struct InMemoryList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> InMemoryList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of values in the list
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a value at the tail
    pub fn append(&mut self, value: T) {
        let index = self.allocate(Node {
            value,
            prev: self.tail,
            next: None,
        });

        match self.tail.and_then(|tail| self.node_mut(tail)) {
            Some(old_tail) => old_tail.next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    /// Insert a value at the head
    pub fn push(&mut self, value: T) {
        let index = self.allocate(Node {
            value,
            prev: None,
            next: self.head,
        });

        match self.head.and_then(|head| self.node_mut(head)) {
            Some(old_head) => old_head.prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
        self.len += 1;
    }

    /// Remove and return the tail value
    ///
    /// Returns `None` when the list is empty.
    pub fn pop(&mut self) -> Option<T> {
        let tail = self.tail?;
        let node = self.slots.get_mut(tail)?.take()?;
        self.free.push(tail);

        self.tail = node.prev;
        match node.prev.and_then(|prev| self.node_mut(prev)) {
            Some(new_tail) => new_tail.next = None,
            None => self.head = None,
        }
        self.len -= 1;

        Some(node.value)
    }

    /// Get the value at a 0-based position without removing it
    ///
    /// Walks from whichever end is closer. Returns `None` when `index` is past
    /// the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        if index <= self.len / 2 {
            return self.iter().nth(index);
        }

        let mut cursor = self.tail?;
        for _ in 0..(self.len - 1 - index) {
            cursor = self.node(cursor)?.prev?;
        }
        self.node(cursor).map(|node| &node.value)
    }

    /// Iterate values from head to tail
    ///
    /// The borrow on the list keeps it from being mutated while the iterator
    /// is alive.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn node(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }
}

impl<T> Default for InMemoryList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for InMemoryList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for InMemoryList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for InMemoryList<T> {}

impl<T> Extend<T> for InMemoryList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for InMemoryList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a InMemoryList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail cursor over an [`InMemoryList`]
///
/// Single pass: once it yields `None` it stays exhausted.
pub struct Iter<'a, T> {
    list: &'a InMemoryList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
