//! Thin aggregation of the uncommitted store (C2) and the committed log (C3).

use std::hash::Hash;
use std::rc::Rc;

use txkv_core::{CompositeJournal, Journal, LeafJournal, Result};

use crate::committed_log::CommittedLog;
use crate::ids::TxId;
use crate::uncommitted_store::UncommittedStore;

/// Facade over [`UncommittedStore`] and [`CommittedLog`].
///
/// Every façade and transaction mutates the uncommitted store only through
/// this type — it owns the commit/rollback protocol that moves a write
/// journal from "uncommitted, keyed by transaction" to "committed, keyed
/// by offset".
pub struct JournalRepository<K, V> {
    uncommitted: UncommittedStore<K, V>,
    committed: CommittedLog<K, V>,
}

impl<K, V> Default for JournalRepository<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> JournalRepository<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Creates an empty repository: no active transactions, empty log.
    pub fn new() -> Self {
        Self {
            uncommitted: UncommittedStore::new(),
            committed: CommittedLog::new(),
        }
    }

    /// Installs a fresh uncommitted journal for `tx`.
    pub fn create(&mut self, tx: TxId) -> Result<()> {
        self.uncommitted.create(tx)
    }

    /// Appends `cell` to `tx`'s own uncommitted journal.
    pub fn put(&mut self, tx: TxId, key: K, cell: txkv_core::Cell<V>) -> Result<()> {
        self.uncommitted.put(tx, key, cell)
    }

    /// A read-only view of `tx`'s own uncommitted journal.
    pub fn self_view(&self, tx: TxId) -> Result<LeafJournal<K, V>> {
        self.uncommitted.view(tx)
    }

    /// A composite over every active transaction's uncommitted journal.
    pub fn all_uncommitted_view(&self) -> CompositeJournal<K, V> {
        self.uncommitted.view_all()
    }

    /// A newest-first composite of committed items with `lo <= offset <= hi`.
    pub fn committed_view(&self, lo: u64, hi: Option<u64>) -> CompositeJournal<K, V> {
        self.committed.view(lo, hi)
    }

    /// The current committed-log offset counter.
    pub fn last_offset(&self) -> u64 {
        self.committed.last_offset()
    }

    /// Takes `tx`'s current write journal, appends it to the committed log,
    /// then hands `tx` a fresh empty journal. Returns the assigned offset.
    pub fn commit(&mut self, tx: TxId) -> Result<u64> {
        let journal_rc = self.uncommitted.journal_rc(tx)?;
        let frozen: Rc<dyn Journal<K, V>> = Rc::new(LeafJournal::new(journal_rc));
        let offset = self.committed.append(frozen);
        self.uncommitted.recreate(tx)?;
        Ok(offset)
    }

    /// Discards `tx`'s current write journal, replacing it with a fresh
    /// empty one. Nothing is appended to the committed log.
    pub fn rollback(&mut self, tx: TxId) -> Result<()> {
        self.uncommitted.recreate(tx)
    }

    /// Removes `tx`'s uncommitted journal entirely, without replacing it.
    /// Used when a transaction's scope ends for good.
    pub fn delete_uncommitted(&mut self, tx: TxId) {
        self.uncommitted.delete(tx);
    }
}
