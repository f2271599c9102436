//! Chain - Doubly-linked cell list used as the linked-list snapshot
//!
//! Cells live in an arena and link to their neighbours by slot index, so a
//! chain never aliases another chain's cells. Removed slots are recycled
//! through a free list.
//!
//! Forking walks the source once from head to tail and rebuilds a fresh,
//! compacted arena: each new cell's backward link points at the cell built
//! just before it, and that cell's forward link is patched in the same step.
//! The walk is iterative, so chain length never grows the call stack.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use super::Snapshot;

/// Handle to one cell inside a specific chain.
///
/// Handles are only meaningful for the chain they came from; a forked chain
/// gets fresh handles.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CellId(usize);

#[derive(Debug)]
struct Cell<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Read-only view of a cell and its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView<'a, T> {
    /// Value stored in the cell.
    pub value: &'a T,
    /// Previous cell, `None` at the head.
    pub prev: Option<CellId>,
    /// Next cell, `None` at the tail.
    pub next: Option<CellId>,
}

/// A doubly-linked list of cells with cached head, tail and length.
pub struct Chain<T> {
    cells: Vec<Option<Cell<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Chain<T> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of cells in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the first cell.
    pub fn head(&self) -> Option<CellId> {
        self.head.map(CellId)
    }

    /// Handle of the last cell.
    pub fn tail(&self) -> Option<CellId> {
        self.tail.map(CellId)
    }

    /// Value at `index`, walking from whichever end is closer.
    pub fn get(&self, index: usize) -> Option<&T> {
        let slot = self.slot_at(index)?;
        self.cell(slot).map(|c| &c.value)
    }

    /// Handle of the cell at `index`.
    pub fn cell_at(&self, index: usize) -> Option<CellId> {
        self.slot_at(index).map(CellId)
    }

    /// Inspects a cell by handle.
    pub fn view(&self, id: CellId) -> Option<CellView<'_, T>> {
        self.cell(id.0).map(|c| CellView {
            value: &c.value,
            prev: c.prev.map(CellId),
            next: c.next.map(CellId),
        })
    }

    /// Appends a value after the tail.
    pub fn push_back(&mut self, value: T) {
        let prev = self.tail;
        let slot = self.alloc(Cell {
            value,
            prev,
            next: None,
        });
        match prev.and_then(|p| self.cell_mut(p)) {
            Some(tail) => tail.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Prepends a value before the head.
    pub fn push_front(&mut self, value: T) {
        let next = self.head;
        let slot = self.alloc(Cell {
            value,
            prev: None,
            next,
        });
        match next.and_then(|n| self.cell_mut(n)) {
            Some(head) => head.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
    }

    /// Inserts `value` so that it ends up at `index`.
    ///
    /// `index == len()` appends. Returns false when `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> bool {
        if index > self.len {
            return false;
        }
        if index == 0 {
            self.push_front(value);
            return true;
        }
        if index == self.len {
            self.push_back(value);
            return true;
        }
        let Some(at) = self.slot_at(index) else {
            return false;
        };
        let prev = self.cell(at).and_then(|c| c.prev);
        let slot = self.alloc(Cell {
            value,
            prev,
            next: Some(at),
        });
        if let Some(p) = prev.and_then(|p| self.cell_mut(p)) {
            p.next = Some(slot);
        }
        if let Some(c) = self.cell_mut(at) {
            c.prev = Some(slot);
        }
        self.len += 1;
        true
    }

    /// Unlinks the cell at `index` and returns its value.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let slot = self.slot_at(index)?;
        self.unlink(slot)
    }

    /// Unlinks the first cell holding `value`.
    pub fn remove_first(&mut self, value: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let index = self.position(value)?;
        self.remove(index)
    }

    /// Replaces the value at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, value: T) -> Option<T> {
        let slot = self.slot_at(index)?;
        let cell = self.cell_mut(slot)?;
        Some(std::mem::replace(&mut cell.value, value))
    }

    /// Index of the first cell holding `value`.
    pub fn position(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|v| v == value)
    }

    /// Drops every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Collects the values into a vector, head first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    fn cell(&self, slot: usize) -> Option<&Cell<T>> {
        self.cells.get(slot)?.as_ref()
    }

    fn cell_mut(&mut self, slot: usize) -> Option<&mut Cell<T>> {
        self.cells.get_mut(slot)?.as_mut()
    }

    fn alloc(&mut self, cell: Cell<T>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.cells[slot] = Some(cell);
                slot
            }
            None => {
                self.cells.push(Some(cell));
                self.cells.len() - 1
            }
        }
    }

    fn unlink(&mut self, slot: usize) -> Option<T> {
        let cell = self.cells.get_mut(slot)?.take()?;
        match cell.prev.and_then(|p| self.cell_mut(p)) {
            Some(p) => p.next = cell.next,
            None => self.head = cell.next,
        }
        match cell.next.and_then(|n| self.cell_mut(n)) {
            Some(n) => n.prev = cell.prev,
            None => self.tail = cell.prev,
        }
        self.free.push(slot);
        self.len -= 1;
        Some(cell.value)
    }

    fn slot_at(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        if index <= self.len / 2 {
            let mut cursor = self.head;
            for _ in 0..index {
                cursor = self.cell(cursor?)?.next;
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in 0..(self.len - 1 - index) {
                cursor = self.cell(cursor?)?.prev;
            }
            cursor
        }
    }

    /// Rebuilds the chain into a fresh, gap-free arena.
    fn compacted(&self) -> Self
    where
        T: Clone,
    {
        let mut cells: Vec<Option<Cell<T>>> = Vec::with_capacity(self.len);
        let mut cursor = self.head;

        while let Some(source) = cursor.and_then(|slot| self.cell(slot)) {
            let slot = cells.len();
            let prev = slot.checked_sub(1);
            if let Some(Some(previous)) = prev.and_then(|p| cells.get_mut(p)) {
                previous.next = Some(slot);
            }
            cells.push(Some(Cell {
                value: source.value.clone(),
                prev,
                next: None,
            }));
            cursor = source.next;
        }

        let len = cells.len();
        Self {
            head: if len == 0 { None } else { Some(0) },
            tail: len.checked_sub(1),
            cells,
            free: Vec::new(),
            len,
        }
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Chain<T> {
    fn clone(&self) -> Self {
        self.compacted()
    }
}

impl<T: Clone> Snapshot for Chain<T> {
    fn fork_copy(&self) -> Self {
        self.compacted()
    }

    fn element_count(&self) -> usize {
        self.len
    }
}

impl<T: PartialEq> PartialEq for Chain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Chain<T> {}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<T> FromIterator<T> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Chain::new();
        for value in iter {
            chain.push_back(value);
        }
        chain
    }
}

impl<T> From<Vec<T>> for Chain<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Serialize> Serialize for Chain<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for value in self.iter() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Chain<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Chain::from)
    }
}

/// Head-to-tail iterator over a chain's values.
pub struct Iter<'a, T> {
    chain: &'a Chain<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let cell = self.chain.cell(self.front?)?;
        self.front = cell.next;
        self.remaining -= 1;
        Some(&cell.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let cell = self.chain.cell(self.back?)?;
        self.back = cell.prev;
        self.remaining -= 1;
        Some(&cell.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
