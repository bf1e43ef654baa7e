//! LRU (Least Recently Used) store implementation
//!
//! Nodes live in an arena addressed by slot index. Slots 0 and 1 are the
//! head (LRU side) and tail (MRU side) sentinels, so linking and unlinking
//! never special-cases an empty or single-entry list. Reclaimed slots go on
//! a free list and are reused by later inserts.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Head sentinel; `nodes[HEAD].next` is the least recently used entry
const HEAD: usize = 0;

/// Tail sentinel; `nodes[TAIL].prev` is the most recently used entry
const TAIL: usize = 1;

/// Upper bound on slots reserved at construction; the arena grows past it
/// on demand
const MAX_PREALLOC: usize = 4096;

/// Slot in the recency list
///
/// `entry` is `None` for the two sentinels and for free slots.
struct Node<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// Fixed-capacity key-value store with least-recently-used eviction
///
/// `get`, `set` and `remove` are O(1). Every successful `get` or `set`
/// moves the entry to the most recently used end; inserting a new key into
/// a full store evicts the entry at the least recently used end.
///
/// ```
/// use lrustore::LruStore;
///
/// let mut store = LruStore::new(2).unwrap();
/// store.set("a", 1);
/// store.set("b", 2);
/// store.get(&"a");
/// store.set("c", 3); // evicts "b"
///
/// assert!(store.contains(&"a"));
/// assert!(!store.contains(&"b"));
/// assert_eq!(store.size(), 2);
/// ```
pub struct LruStore<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new store holding at most `capacity` entries
    ///
    /// # Returns
    /// * `Err(Error::Configuration)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Ok(Self::with_capacity(capacity)),
            None => Err(Error::zero_capacity()),
        }
    }

    /// Create a new store from a capacity that is known to be positive
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        debug!(capacity, "created LRU store");

        // One extra slot: an insert links the new entry before evicting.
        let reserve = capacity.min(MAX_PREALLOC).saturating_add(1);
        let mut nodes = Vec::with_capacity(reserve + 2);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());

        Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            nodes,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Get a value and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        self.nodes[idx].entry.as_ref().map(|(_, value)| value)
    }

    /// Get a mutable reference to a value and mark it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        self.nodes[idx].entry.as_mut().map(|(_, value)| value)
    }

    /// Get a value without touching the recency order
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.nodes[idx].entry.as_ref().map(|(_, value)| value)
    }

    /// Check whether a key is present without touching the recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert or replace a value and mark it most recently used
    pub fn set(&mut self, key: K, value: V) {
        let _ = self.push(key, value);
    }

    /// Insert or replace a value, returning what left the store
    ///
    /// # Returns
    /// * `Some((key, old_value))` if `key` was already present
    /// * `Some((evicted_key, evicted_value))` if the insert overflowed capacity
    /// * `None` otherwise
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            self.promote(idx);
            return self.nodes[idx].entry.replace((key, value));
        }

        let idx = self.alloc(key.clone(), value);
        self.link_mru(idx);
        self.map.insert(key, idx);

        if self.map.len() > self.capacity {
            self.evict()
        } else {
            None
        }
    }

    /// Remove a key from the store
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.release(idx).map(|(_, value)| value)
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let idx = self.nodes[HEAD].next;
        if idx == TAIL {
            return None;
        }
        self.unlink(idx);
        let (key, value) = self.release(idx)?;
        self.map.remove(&key);
        Some((key, value))
    }

    /// Look at the next eviction candidate without touching the recency order
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let idx = self.nodes[HEAD].next;
        self.nodes[idx]
            .entry
            .as_ref()
            .map(|(key, value)| (key, value))
    }

    /// Get the current number of entries
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Alias of [`size`](Self::size)
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the fixed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry; capacity is unchanged
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.truncate(2);
        self.nodes[HEAD] = Node::sentinel();
        self.nodes[TAIL] = Node::sentinel();
        self.free_list.clear();
    }

    /// Iterate entries from most to least recently used
    ///
    /// Iteration does not change the recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.nodes[TAIL].prev,
            remaining: self.map.len(),
        }
    }

    /// Verify the index and the recency list agree
    ///
    /// Walks the list from the LRU end and checks link symmetry, that every
    /// linked entry is indexed at its own slot, that the entry count matches
    /// the index, and that every other slot is on the free list.
    pub fn check_invariants(&self) -> Result<()> {
        if self.map.len() > self.capacity {
            return Err(Error::invariant(format!(
                "size {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        if self.nodes[HEAD].entry.is_some() || self.nodes[TAIL].entry.is_some() {
            return Err(Error::invariant("sentinel holds an entry"));
        }

        let mut linked = 0;
        let mut prev = HEAD;
        let mut cursor = self.nodes[HEAD].next;
        while cursor != TAIL {
            if linked > self.nodes.len() {
                return Err(Error::invariant("recency list contains a cycle"));
            }
            let node = &self.nodes[cursor];
            if node.prev != prev {
                return Err(Error::invariant(format!(
                    "slot {} has prev {} but was reached from {}",
                    cursor, node.prev, prev
                )));
            }
            let Some((key, _)) = node.entry.as_ref() else {
                return Err(Error::invariant(format!("slot {} is linked but empty", cursor)));
            };
            if self.map.get(key) != Some(&cursor) {
                return Err(Error::invariant(format!(
                    "slot {} is linked but not indexed at that slot",
                    cursor
                )));
            }
            linked += 1;
            prev = cursor;
            cursor = node.next;
        }
        if self.nodes[TAIL].prev != prev {
            return Err(Error::invariant("tail sentinel does not point at last entry"));
        }

        if linked != self.map.len() {
            return Err(Error::invariant(format!(
                "{} linked entries but {} indexed keys",
                linked,
                self.map.len()
            )));
        }
        if self.free_list.len() + linked + 2 != self.nodes.len() {
            return Err(Error::invariant(format!(
                "{} slots, {} linked, {} free",
                self.nodes.len(),
                linked,
                self.free_list.len()
            )));
        }
        if let Some(&idx) = self.free_list.iter().find(|&&idx| self.nodes[idx].entry.is_some()) {
            return Err(Error::invariant(format!("free slot {} still holds an entry", idx)));
        }

        Ok(())
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let evicted = self.pop_lru();
        if evicted.is_some() {
            trace!(capacity = self.capacity, "evicted least recently used entry");
        }
        evicted
    }

    fn promote(&mut self, idx: usize) {
        if self.nodes[TAIL].prev == idx {
            return; // Already most recent
        }
        self.unlink(idx);
        self.link_mru(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn link_mru(&mut self, idx: usize) {
        let last = self.nodes[TAIL].prev;
        self.nodes[idx].prev = last;
        self.nodes[idx].next = TAIL;
        self.nodes[last].next = idx;
        self.nodes[TAIL].prev = idx;
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].entry = Some((key, value));
            idx
        } else {
            self.nodes.push(Node {
                entry: Some((key, value)),
                prev: HEAD,
                next: TAIL,
            });
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        let entry = self.nodes[idx].entry.take();
        self.free_list.push(idx);
        entry
    }
}

impl<K, V> fmt::Debug for LruStore<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.capacity)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a LruStore<K, V>);

impl<K, V> fmt::Debug for DebugEntries<'_, K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Iterator over store entries, most recently used first
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.cursor];
        let (key, value) = node.entry.as_ref()?;
        self.cursor = node.prev;
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a LruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
