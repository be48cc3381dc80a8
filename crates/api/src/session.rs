//! `Session`: a façade holding at most one explicitly managed transaction.
//!
//! Unlike [`crate::TransactionDict`], `Session` never opens a transaction
//! implicitly: every read or write requires a transaction the caller
//! opened with [`Session::begin`], and every operation on a session with
//! no open transaction fails with `SessionError`. This is the "no
//! implicit opening" design the engine's design notes call for.

use std::fmt::Debug;
use std::hash::Hash;

use txkv_concurrency::{IsolationLevel, Strategy, Transaction, TransactionFactory};
use txkv_core::{Error, Result};

/// Holds at most one open [`Transaction`] at a time.
pub struct Session<K, V> {
    factory: TransactionFactory<K, V>,
    open: Option<Transaction<K, V>>,
}

impl<K, V> Session<K, V>
where
    K: Eq + Hash + Clone + Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    /// Builds a session with no open transaction, backed by `strategy`,
    /// with its own store.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            factory: TransactionFactory::new(strategy),
            open: None,
        }
    }

    /// Builds a session over an existing factory, with no open
    /// transaction. Cloning a factory shares its store, so this is how
    /// several sessions (or a session and a [`crate::TransactionDict`])
    /// can interleave transactions over the same underlying data.
    pub fn from_factory(factory: TransactionFactory<K, V>) -> Self {
        Self { factory, open: None }
    }

    /// True if a transaction is currently open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Opens a transaction at `isolation_level`. `SessionError` if one is
    /// already open.
    pub fn begin(&mut self, isolation_level: IsolationLevel) -> Result<()> {
        if self.open.is_some() {
            return Err(Error::SessionError(
                "a transaction is already open on this session".into(),
            ));
        }
        let tx = self.factory.create(isolation_level)?;
        tx.start()?;
        self.open = Some(tx);
        Ok(())
    }

    fn active(&self) -> Result<&Transaction<K, V>> {
        self.open
            .as_ref()
            .ok_or_else(|| Error::SessionError("no transaction is open on this session".into()))
    }

    /// Reads `key` through the open transaction.
    pub fn get(&self, key: &K) -> Result<V> {
        self.active()?.get(key)
    }

    /// Writes `value` for `key` through the open transaction.
    pub fn set(&self, key: K, value: V) -> Result<()> {
        self.active()?.set(key, value)
    }

    /// Deletes `key` through the open transaction.
    pub fn delete(&self, key: &K) -> Result<()> {
        self.active()?.delete(key)
    }

    /// True if `key` is present, through the open transaction.
    pub fn contains(&self, key: &K) -> Result<bool> {
        self.active()?.contains(key)
    }

    /// The present keys, through the open transaction.
    pub fn iter(&self) -> Result<Vec<K>> {
        self.active()?.iter()
    }

    /// Number of present keys, through the open transaction.
    pub fn len(&self) -> Result<usize> {
        self.active()?.len()
    }

    /// True if there are no present keys, through the open transaction.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Commits the open transaction and closes the session.
    ///
    /// `SessionError` if none is open. On a commit-time conflict (a
    /// multi-version `SerializationError`), the transaction is left open
    /// — per the engine's error-handling contract, a rejected commit
    /// leaves the transaction active so the caller can retry the commit
    /// or roll back — and the error is returned without closing the
    /// session.
    pub fn commit(&mut self) -> Result<()> {
        self.active()?.commit()?;
        if let Some(tx) = self.open.take() {
            tx.end()?;
        }
        Ok(())
    }

    /// Rolls back the open transaction and closes the session.
    /// `SessionError` if none is open.
    pub fn rollback(&mut self) -> Result<()> {
        self.active()?.rollback()?;
        if let Some(tx) = self.open.take() {
            tx.end()?;
        }
        Ok(())
    }
}
