//! Ordered Keyed List
//!
//! A doubly-linked list whose entries are also indexed by a unique key.
//!
//! Entries live in a dense arena; order is kept with explicit `prev`/`next`
//! slot indices and a separate key → slot map gives O(1) lookup. Any
//! operation that would insert an entry whose key is already present moves
//! the existing entry to the requested position instead. The existing
//! value is kept; use [`OrderedKeyedList::value_mut`] to update it.
//!
//! [`Position`] handles carry a generation counter, so a handle to a removed
//! entry never resolves to a later entry that reuses the same slot.

use std::collections::HashMap;
use std::hash::Hash;

/// Implemented by values stored in an [`OrderedKeyedList`].
pub trait Keyed<K> {
    /// The unique key of this value.
    fn key(&self) -> K;
}

/// Stable handle to an entry of an [`OrderedKeyedList`].
///
/// Valid until the entry is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    slot: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    generation: u64,
    entry: Option<Entry<V>>,
}

/// Combined hash index and doubly-linked list.
#[derive(Debug, Clone)]
pub struct OrderedKeyedList<K, V> {
    slots: Vec<Slot<V>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> Default for OrderedKeyedList<K, V>
where
    K: Eq + Hash,
    V: Keyed<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedKeyedList<K, V>
where
    K: Eq + Hash,
    V: Keyed<K>,
{
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Remove every entry. Outstanding positions become invalid.
    pub fn clear(&mut self) {
        for (slot, state) in self.slots.iter_mut().enumerate() {
            if state.entry.take().is_some() {
                state.generation += 1;
                self.free.push(slot);
            }
        }
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    /// Look up the position of `key` without changing the order.
    pub fn get(&self, key: &K) -> Option<Position> {
        self.index.get(key).map(|&slot| self.position_of(slot))
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// The value at `pos`.
    pub fn value(&self, pos: Position) -> Option<&V> {
        self.entry(pos).map(|e| &e.value)
    }

    /// Mutable access to the value at `pos`.
    ///
    /// The key of the value must not change.
    pub fn value_mut(&mut self, pos: Position) -> Option<&mut V> {
        self.entry_mut(pos).map(|e| &mut e.value)
    }

    /// First entry.
    pub fn front(&self) -> Option<Position> {
        self.head.map(|slot| self.position_of(slot))
    }

    /// Last entry.
    pub fn back(&self) -> Option<Position> {
        self.tail.map(|slot| self.position_of(slot))
    }

    /// Entry after `pos`.
    pub fn next(&self, pos: Position) -> Option<Position> {
        self.entry(pos)?.next.map(|slot| self.position_of(slot))
    }

    /// Entry before `pos`.
    pub fn prev(&self, pos: Position) -> Option<Position> {
        self.entry(pos)?.prev.map(|slot| self.position_of(slot))
    }

    /// Iterate values front to back.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Insert `value` at the front, or move its existing entry there.
    pub fn push_front(&mut self, value: V) -> Position {
        if let Some(pos) = self.get(&value.key()) {
            self.move_to_front(pos);
            return pos;
        }
        let slot = self.allocate(value);
        self.link_after(slot, None);
        self.position_of(slot)
    }

    /// Insert `value` at the back, or move its existing entry there.
    pub fn push_back(&mut self, value: V) -> Position {
        if let Some(pos) = self.get(&value.key()) {
            self.move_to_back(pos);
            return pos;
        }
        let slot = self.allocate(value);
        self.link_after(slot, self.tail);
        self.position_of(slot)
    }

    /// Insert `value` immediately before `mark`, or move its existing entry
    /// there. `None` if `mark` is not a valid position.
    pub fn insert_before(&mut self, value: V, mark: Position) -> Option<Position> {
        let mark_slot = self.slot_of(mark)?;
        if let Some(pos) = self.get(&value.key()) {
            self.move_before(pos, mark);
            return Some(pos);
        }
        let prev = self.slots[mark_slot].entry.as_ref()?.prev;
        let slot = self.allocate(value);
        self.link_after(slot, prev);
        Some(self.position_of(slot))
    }

    /// Insert `value` immediately after `mark`, or move its existing entry
    /// there. `None` if `mark` is not a valid position.
    pub fn insert_after(&mut self, value: V, mark: Position) -> Option<Position> {
        let mark_slot = self.slot_of(mark)?;
        if let Some(pos) = self.get(&value.key()) {
            self.move_after(pos, mark);
            return Some(pos);
        }
        let slot = self.allocate(value);
        self.link_after(slot, Some(mark_slot));
        Some(self.position_of(slot))
    }

    /// Remove the entry at `pos` from both the order and the key index.
    ///
    /// `None` if `pos` is not a valid position.
    pub fn remove(&mut self, pos: Position) -> Option<V> {
        let slot = self.slot_of(pos)?;
        self.unlink(slot);
        let state = &mut self.slots[slot];
        let entry = state.entry.take()?;
        state.generation += 1;
        self.free.push(slot);
        self.index.remove(&entry.value.key());
        Some(entry.value)
    }

    /// Move the entry at `pos` to the front. Returns false for an invalid
    /// position.
    pub fn move_to_front(&mut self, pos: Position) -> bool {
        let Some(slot) = self.slot_of(pos) else {
            return false;
        };
        if self.head != Some(slot) {
            self.unlink(slot);
            self.link_after(slot, None);
        }
        true
    }

    /// Move the entry at `pos` to the back. Returns false for an invalid
    /// position.
    pub fn move_to_back(&mut self, pos: Position) -> bool {
        let Some(slot) = self.slot_of(pos) else {
            return false;
        };
        if self.tail != Some(slot) {
            self.unlink(slot);
            self.link_after(slot, self.tail);
        }
        true
    }

    /// Move the entry at `pos` immediately before `mark`.
    ///
    /// A no-op returning true when `pos == mark`; false if either position
    /// is invalid.
    pub fn move_before(&mut self, pos: Position, mark: Position) -> bool {
        let (Some(slot), Some(mark_slot)) = (self.slot_of(pos), self.slot_of(mark)) else {
            return false;
        };
        if slot != mark_slot {
            self.unlink(slot);
            let prev = self.slots[mark_slot].entry.as_ref().and_then(|e| e.prev);
            self.link_after(slot, prev);
        }
        true
    }

    /// Move the entry at `pos` immediately after `mark`.
    ///
    /// A no-op returning true when `pos == mark`; false if either position
    /// is invalid.
    pub fn move_after(&mut self, pos: Position, mark: Position) -> bool {
        let (Some(slot), Some(mark_slot)) = (self.slot_of(pos), self.slot_of(mark)) else {
            return false;
        };
        if slot != mark_slot {
            self.unlink(slot);
            self.link_after(slot, Some(mark_slot));
        }
        true
    }

    /// Splice all of `other` onto the front of this list, keeping `other`'s
    /// order. Keys already present are moved rather than duplicated.
    pub fn append_all_front(&mut self, other: Self) {
        let mut values: Vec<V> = other.into_values();
        while let Some(value) = values.pop() {
            self.push_front(value);
        }
    }

    /// Splice all of `other` onto the back of this list, keeping `other`'s
    /// order. Keys already present are moved rather than duplicated.
    pub fn append_all_back(&mut self, other: Self) {
        for value in other.into_values() {
            self.push_back(value);
        }
    }

    /// Consume the list, yielding values front to back.
    pub fn into_values(mut self) -> Vec<V> {
        let mut values = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            match self.slots[slot].entry.take() {
                Some(entry) => {
                    cursor = entry.next;
                    values.push(entry.value);
                }
                None => break,
            }
        }
        values
    }

    fn position_of(&self, slot: usize) -> Position {
        Position {
            slot,
            generation: self.slots[slot].generation,
        }
    }

    fn slot_of(&self, pos: Position) -> Option<usize> {
        let state = self.slots.get(pos.slot)?;
        (state.generation == pos.generation && state.entry.is_some()).then_some(pos.slot)
    }

    fn entry(&self, pos: Position) -> Option<&Entry<V>> {
        let slot = self.slot_of(pos)?;
        self.slots[slot].entry.as_ref()
    }

    fn entry_mut(&mut self, pos: Position) -> Option<&mut Entry<V>> {
        let slot = self.slot_of(pos)?;
        self.slots[slot].entry.as_mut()
    }

    /// Store `value` in a free slot and index it. The entry is not linked.
    fn allocate(&mut self, value: V) -> usize {
        let key = value.key();
        let entry = Entry {
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot].entry = Some(entry);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        slot
    }

    /// Link an unlinked `slot` after `prev`, or at the head when `prev` is
    /// `None`.
    fn link_after(&mut self, slot: usize, prev: Option<usize>) {
        let next = match prev {
            Some(p) => self.slots[p].entry.as_ref().and_then(|e| e.next),
            None => self.head,
        };
        if let Some(entry) = self.slots[slot].entry.as_mut() {
            entry.prev = prev;
            entry.next = next;
        }
        match prev {
            Some(p) => {
                if let Some(e) = self.slots[p].entry.as_mut() {
                    e.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        match next {
            Some(n) => {
                if let Some(e) = self.slots[n].entry.as_mut() {
                    e.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
    }

    /// Detach `slot` from its neighbours. The entry stays allocated.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = match self.slots[slot].entry.as_mut() {
            Some(e) => (e.prev.take(), e.next.take()),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(e) = self.slots[p].entry.as_mut() {
                    e.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(e) = self.slots[n].entry.as_mut() {
                    e.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

/// Front-to-back iterator over an [`OrderedKeyedList`].
pub struct Iter<'a, K, V> {
    list: &'a OrderedKeyedList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let entry = self.list.slots[slot].entry.as_ref()?;
        self.cursor = entry.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedKeyedList<K, V>
where
    K: Eq + Hash,
    V: Keyed<K>,
{
    type Item = &'a V;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
