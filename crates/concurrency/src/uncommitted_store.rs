//! Per-transaction writable journals, indexed by transaction identity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use txkv_core::{Cell, CompositeJournal, Error, Journal, LeafJournal, MutableJournal, Result};

use crate::ids::TxId;

/// Holds exactly one mutable journal per transaction currently between
/// `create` and `delete` (invariant I1).
pub struct UncommittedStore<K, V> {
    journals: HashMap<TxId, Rc<RefCell<MutableJournal<K, V>>>>,
}

impl<K, V> Default for UncommittedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> UncommittedStore<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            journals: HashMap::new(),
        }
    }

    /// Installs an empty mutable journal for `tx`. Fails with
    /// `RepositoryError` if one already exists.
    pub fn create(&mut self, tx: TxId) -> Result<()> {
        if self.journals.contains_key(&tx) {
            return Err(Error::RepositoryError(format!(
                "uncommitted journal already exists for {tx}"
            )));
        }
        self.journals
            .insert(tx, Rc::new(RefCell::new(MutableJournal::new())));
        Ok(())
    }

    /// A read-only view of `tx`'s own journal.
    pub fn view(&self, tx: TxId) -> Result<LeafJournal<K, V>> {
        let journal = self.journal_rc(tx)?;
        Ok(LeafJournal::new(journal))
    }

    /// A composite over every currently active transaction's journal, used
    /// by read-uncommitted to see everyone's pending writes.
    pub fn view_all(&self) -> CompositeJournal<K, V> {
        let layers: Vec<Rc<dyn Journal<K, V>>> = self
            .journals
            .values()
            .map(|j| Rc::new(LeafJournal::new(j.clone())) as Rc<dyn Journal<K, V>>)
            .collect();
        CompositeJournal::new(layers)
    }

    /// Appends `cell` to `tx`'s journal (last-write-wins within the
    /// transaction).
    pub fn put(&mut self, tx: TxId, key: K, cell: Cell<V>) -> Result<()> {
        let journal = self.journal_rc(tx)?;
        journal.borrow_mut().insert(key, cell);
        Ok(())
    }

    /// Removes `tx`'s entry entirely. A no-op if none exists.
    pub fn delete(&mut self, tx: TxId) {
        self.journals.remove(&tx);
    }

    /// `delete` followed by `create` — used after commit and rollback to
    /// hand the transaction a fresh, empty journal.
    pub fn recreate(&mut self, tx: TxId) -> Result<()> {
        self.delete(tx);
        self.create(tx)
    }

    /// The shared handle to `tx`'s journal, for callers (the journal
    /// repository's commit path) that need to freeze it into the
    /// committed log.
    pub(crate) fn journal_rc(&self, tx: TxId) -> Result<Rc<RefCell<MutableJournal<K, V>>>> {
        self.journals
            .get(&tx)
            .cloned()
            .ok_or_else(|| Error::RepositoryError(format!("no uncommitted journal for {tx}")))
    }
}
