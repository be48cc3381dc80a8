//! The journal algebra: mutable, leaf, and composite journal shapes.
//!
//! A journal is a finite mapping from key to [`Cell`]. Composing journals —
//! a transaction's own write set in front, the committed log behind — is
//! what makes every isolation level reduce to "which journals participate,
//! in which order".

use crate::cell::Cell;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

/// A read-only view over a key -> cell mapping.
///
/// Implementors provide the three observable shapes the data model
/// describes: an owned [`MutableJournal`] (a transaction's write buffer), a
/// [`LeafJournal`] (a read-only handle onto a live, possibly shared,
/// mutable journal), and a [`CompositeJournal`] (an ordered chain searched
/// first-match-wins).
pub trait Journal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Returns the cell stored for `key`, if this journal carries one.
    fn get(&self, key: &K) -> Option<Cell<V>>;

    /// Iterates every distinct key this journal carries, each exactly once,
    /// paired with its cell. Order is first-appearance order for composites.
    fn iter(&self) -> Box<dyn Iterator<Item = (K, Cell<V>)> + '_>;

    /// Number of distinct keys visible through this journal, regardless of
    /// whether their cell is a tombstone.
    fn len(&self) -> usize;

    /// True if this journal carries no keys at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An owned, mutable journal: the write buffer of a single transaction.
///
/// `insert` and `delete` are local and never fail except `delete` on a key
/// this journal itself has no entry for — the absence check a transaction
/// performs before deleting (via its composed read view) is a separate,
/// higher-level concern; see `txkv-concurrency`.
#[derive(Debug, Default)]
pub struct MutableJournal<K, V> {
    entries: HashMap<K, Cell<V>>,
}

impl<K, V> MutableJournal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Sets the cell for `key`, overwriting any existing entry
    /// (last-write-wins within the journal).
    pub fn insert(&mut self, key: K, cell: Cell<V>) {
        self.entries.insert(key, cell);
    }

    /// Marks `key` as deleted in this journal. Fails with `None` if this
    /// journal has no entry — present or tombstoned — for the key.
    pub fn delete(&mut self, key: &K) -> Option<()> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.entries.insert(key.clone(), Cell::Tombstone);
        Some(())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> Journal<K, V> for MutableJournal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<Cell<V>> {
        self.entries.get(key).cloned()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (K, Cell<V>)> + '_> {
        Box::new(self.entries.iter().map(|(k, c)| (k.clone(), c.clone())))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A read-only wrapper around a live, possibly shared, journal.
///
/// Used to hand out a read-only handle onto a transaction's own mutable
/// journal: reads see subsequent writes immediately (invariant I5), since
/// the wrapper holds a shared reference, not a snapshot.
pub struct LeafJournal<K, V> {
    inner: Rc<RefCell<MutableJournal<K, V>>>,
}

impl<K, V> LeafJournal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Wraps a shared mutable journal in a read-only view.
    pub fn new(inner: Rc<RefCell<MutableJournal<K, V>>>) -> Self {
        Self { inner }
    }
}

impl<K, V> Journal<K, V> for LeafJournal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<Cell<V>> {
        self.inner.borrow().get(key)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (K, Cell<V>)> + '_> {
        let entries: Vec<_> = self.inner.borrow().iter().collect();
        Box::new(entries.into_iter())
    }

    fn len(&self) -> usize {
        self.inner.borrow().len()
    }
}

/// An ordered chain of inner journals, searched first-match-wins.
///
/// Layers are searched front-to-back: `get` returns the first cell found.
/// `iter`/`len` treat each key once, at its first occurrence — a visited
/// set, not a runtime chain-map primitive.
pub struct CompositeJournal<K, V> {
    layers: Vec<Rc<dyn Journal<K, V>>>,
}

impl<K, V> CompositeJournal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Builds a composite over `layers`, searched in the given order.
    pub fn new(layers: Vec<Rc<dyn Journal<K, V>>>) -> Self {
        Self { layers }
    }

    /// A composite with no layers at all — always empty.
    pub fn empty() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<K, V> Journal<K, V> for CompositeJournal<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<Cell<V>> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (K, Cell<V>)> + '_> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for layer in &self.layers {
            for (k, cell) in layer.iter() {
                if seen.insert(k.clone()) {
                    out.push((k, cell));
                }
            }
        }
        Box::new(out.into_iter())
    }

    fn len(&self) -> usize {
        let mut seen = HashSet::new();
        for layer in &self.layers {
            for (k, _) in layer.iter() {
                seen.insert(k);
            }
        }
        seen.len()
    }
}
