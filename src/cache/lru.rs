//! Recency List Module
//!
//! Doubly linked list of entries ordered by access time, stored in an arena.
//!
//! Nodes live in a `Vec` slot and link to each other by slot index, so the
//! key index can hold a plain `NodeHandle` instead of a pointer. Freed slots
//! are recycled through a free list, and each slot carries a generation that
//! is bumped whenever its node is removed, so handles to a recycled slot go
//! stale instead of aliasing the new entry.

use crate::cache::Entry;

// == Node Handle ==
/// Stable reference to a node in the [`RecencyList`].
///
/// A handle stays valid until its node is removed. After that it is stale:
/// every operation taking it does nothing, even once the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    idx: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    entry: Entry,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Every operation except iteration is O(1).
#[derive(Debug, Default)]
pub struct RecencyList {
    /// Arena of node slots, `None` for free slots
    nodes: Vec<Option<Node>>,
    /// Generation of each slot, parallel to `nodes`
    generations: Vec<u32>,
    /// Most recently used slot
    head: Option<usize>,
    /// Least recently used slot
    tail: Option<usize>,
    /// Recycled slot indices
    free: Vec<usize>,
    /// Number of live nodes
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Front ==
    /// Inserts an entry as the most recently used and returns its handle.
    pub fn push_front(&mut self, entry: Entry) -> NodeHandle {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.generations.push(0);
                self.nodes.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        self.handle_at(idx)
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Stale handles are ignored.
    pub fn move_to_front(&mut self, handle: NodeHandle) {
        if !self.is_live(handle) || self.head == Some(handle.idx) {
            return;
        }

        self.unlink(handle.idx);
        self.link_front(handle.idx);
    }

    // == Remove ==
    /// Unlinks a node from any position and returns its entry.
    ///
    /// Returns None for a stale handle.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<Entry> {
        if !self.is_live(handle) {
            return None;
        }

        self.unlink(handle.idx);
        let node = self.nodes[handle.idx].take()?;
        self.generations[handle.idx] = self.generations[handle.idx].wrapping_add(1);
        self.free.push(handle.idx);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<Entry> {
        let tail = self.tail?;
        self.remove(self.handle_at(tail))
    }

    // == Peek ==
    /// Returns the least recently used entry without removing it.
    pub fn back(&self) -> Option<&Entry> {
        self.tail.and_then(|idx| self.entry_at(idx))
    }

    /// Returns the most recently used entry.
    pub fn front(&self) -> Option<&Entry> {
        self.head.and_then(|idx| self.entry_at(idx))
    }

    /// Returns the entry behind a handle without changing its position.
    pub fn get(&self, handle: NodeHandle) -> Option<&Entry> {
        if !self.is_live(handle) {
            return None;
        }
        self.entry_at(handle.idx)
    }

    /// Mutable access to the entry behind a handle. Position is unchanged.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Entry> {
        if !self.is_live(handle) {
            return None;
        }
        self.nodes
            .get_mut(handle.idx)
            .and_then(|slot| slot.as_mut())
            .map(|node| &mut node.entry)
    }

    // == Length ==
    /// Returns the number of entries in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    /// Returns true if the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every entry. All outstanding handles become stale.
    ///
    /// Slots are kept for reuse with their generations bumped.
    pub fn clear(&mut self) {
        for (slot, generation) in self.nodes.iter_mut().zip(self.generations.iter_mut()) {
            if slot.take().is_some() {
                *generation = generation.wrapping_add(1);
            }
        }
        self.free = (0..self.nodes.len()).rev().collect();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iterate ==
    /// Returns a lazy iterator from most to least recently used.
    ///
    /// The iterator is `Clone`, so a traversal can be restarted from a saved
    /// copy. It never changes the order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn is_live(&self, handle: NodeHandle) -> bool {
        matches!(self.nodes.get(handle.idx), Some(Some(_)))
            && self.generations.get(handle.idx) == Some(&handle.generation)
    }

    fn handle_at(&self, idx: usize) -> NodeHandle {
        NodeHandle {
            idx,
            generation: self.generations[idx],
        }
    }

    fn entry_at(&self, idx: usize) -> Option<&Entry> {
        self.nodes
            .get(idx)
            .and_then(|slot| slot.as_ref())
            .map(|node| &node.entry)
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }

        if let Some(head_idx) = old_head {
            if let Some(head) = self.nodes[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.nodes[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.nodes[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }
}

// == Iterator ==
/// Front-to-back traversal of a [`RecencyList`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.nodes.get(idx)?.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RecencyList {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
