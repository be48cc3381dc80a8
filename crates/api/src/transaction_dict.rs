//! `TransactionDict`: an auto-commit, dictionary-like façade.
//!
//! Every operation opens a fresh transaction, performs exactly one read or
//! write, commits on a successful write (or simply ends on a read), and
//! returns the result. The isolation level is always read-committed,
//! regardless of the embedding application's preference — that is the
//! original façade's actual choice, carried forward rather than made
//! configurable.

use txkv_concurrency::{IsolationLevel, Strategy, Transaction, TransactionFactory};
use txkv_core::Result;
use std::fmt::Debug;
use std::hash::Hash;

/// An associative-container façade over the transactional engine.
///
/// `TransactionDict` adds no isolation or conflict-detection logic of its
/// own — it is a thin convenience wrapper that always opens a
/// read-committed transaction, matching the behavior of the locallib
/// front-end this crate generalizes.
pub struct TransactionDict<K, V> {
    factory: TransactionFactory<K, V>,
}

impl<K, V> TransactionDict<K, V>
where
    K: Eq + Hash + Clone + Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    /// Builds an empty dict backed by `strategy`, with its own store.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            factory: TransactionFactory::new(strategy),
        }
    }

    /// Builds a dict over an existing factory. Cloning a factory shares
    /// its store, so this is how a `TransactionDict` and one or more
    /// [`crate::Session`]s can operate on the same underlying data.
    pub fn from_factory(factory: TransactionFactory<K, V>) -> Self {
        Self { factory }
    }

    /// Runs `f` inside a single read-committed transaction, ending it
    /// (and thereby releasing any locks it acquired) on every exit path,
    /// regardless of whether `f` succeeded.
    fn with_transaction<T>(&self, f: impl FnOnce(&Transaction<K, V>) -> Result<T>) -> Result<T> {
        let tx = self.factory.create(IsolationLevel::ReadCommitted)?;
        tx.start()?;
        let result = f(&tx);
        tx.end()?;
        result
    }

    /// Reads `key`. `NotFound` if absent or tombstoned.
    pub fn get(&self, key: &K) -> Result<V> {
        self.with_transaction(|tx| tx.get(key))
    }

    /// Writes `value` for `key` and commits.
    pub fn set(&self, key: K, value: V) -> Result<()> {
        self.with_transaction(move |tx| {
            tx.set(key, value)?;
            tx.commit()
        })
    }

    /// Deletes `key` and commits. `NotFound` if `key` was not present.
    pub fn delete(&self, key: &K) -> Result<()> {
        self.with_transaction(|tx| {
            tx.delete(key)?;
            tx.commit()
        })
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &K) -> Result<bool> {
        self.with_transaction(|tx| tx.contains(key))
    }

    /// The present keys, snapshotted under one read-committed transaction.
    pub fn iter(&self) -> Result<Vec<K>> {
        self.with_transaction(|tx| tx.iter())
    }

    /// Number of present keys.
    pub fn len(&self) -> Result<usize> {
        self.with_transaction(|tx| tx.len())
    }

    /// True if there are no present keys.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
