//! The no-wait lock registry the lock-based isolation levels share.

use std::collections::HashMap;
use std::hash::Hash;

use txkv_core::{Error, Result};

use crate::ids::TxId;

/// A lock entry: either a specific key or the full-range sentinel.
///
/// `AnyKey` coexists with key-locks held by the same owner only (invariant
/// I4) — it models an intent-to-scan lock rather than a true mutual
/// exclusion over every key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LockEntry<K> {
    Key(K),
    AnyKey,
}

/// Mapping from a lock entry to the single transaction that owns it.
///
/// This is no-wait two-phase locking with a range intent: a conflicting
/// acquisition fails immediately with [`Error::AccessError`] rather than
/// blocking, pushing deadlock avoidance (retry policy) up to the caller.
/// Shared across every lock-strategy transaction built from the same
/// [`crate::TransactionFactory`].
#[derive(Debug, Default)]
pub struct AccessProtector<K> {
    locks: HashMap<LockEntry<K>, TxId>,
}

impl<K> AccessProtector<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Creates a registry with no locks held.
    pub fn new() -> Self {
        Self {
            locks: HashMap::new(),
        }
    }

    /// Acquires the key-lock on `key` for `tx`.
    ///
    /// Succeeds if `key` is unlocked or already owned by `tx`, and the
    /// full-lock sentinel is unlocked or owned by `tx`. Idempotent:
    /// re-acquiring a lock `tx` already holds is a no-op success.
    pub fn acquire_key(&mut self, tx: TxId, key: &K) -> Result<()> {
        if let Some(owner) = self.locks.get(&LockEntry::Key(key.clone())) {
            if *owner != tx {
                return Err(Error::AccessError(format!(
                    "key {key:?} is locked by {owner}"
                )));
            }
        }
        if let Some(owner) = self.locks.get(&LockEntry::AnyKey) {
            if *owner != tx {
                return Err(Error::AccessError(format!(
                    "full lock is held by {owner}"
                )));
            }
        }
        self.locks.insert(LockEntry::Key(key.clone()), tx);
        Ok(())
    }

    /// Acquires the full-range lock for `tx`.
    ///
    /// Succeeds iff every lock currently held is owned by `tx` (the set of
    /// owners, besides `tx` itself, is empty).
    pub fn acquire_full(&mut self, tx: TxId) -> Result<()> {
        if self.locks.values().any(|owner| *owner != tx) {
            return Err(Error::AccessError(
                "full lock conflicts with a lock held by another transaction".into(),
            ));
        }
        self.locks.insert(LockEntry::AnyKey, tx);
        Ok(())
    }

    /// Releases every lock owned by `tx`. Called on commit, rollback, and
    /// transaction end.
    pub fn release_by(&mut self, tx: TxId) {
        self.locks.retain(|_, owner| *owner != tx);
    }

    /// Releases the key-lock on `key`, regardless of owner. Used by
    /// tooling/tests.
    pub fn release_key(&mut self, key: &K) {
        self.locks.remove(&LockEntry::Key(key.clone()));
    }

    /// Releases the full-range lock, regardless of owner. Used by
    /// tooling/tests.
    pub fn release_full(&mut self) {
        self.locks.remove(&LockEntry::AnyKey);
    }
}
