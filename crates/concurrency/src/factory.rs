//! Selects and constructs the right transaction variant from
//! (strategy, isolation level).

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use txkv_core::{Error, Result};

use crate::access_protector::AccessProtector;
use crate::ids::TxId;
use crate::isolation::{IsolationLevel, Strategy};
use crate::repository::JournalRepository;
use crate::transaction::Transaction;

/// Builds [`Transaction`]s for a single, fixed [`Strategy`], allocating
/// each a fresh [`TxId`] and wiring it to the shared [`JournalRepository`]
/// (and, for the lock strategy, the shared [`AccessProtector`]).
///
/// Multi-version does not implement read-uncommitted: asking for that
/// combination fails with `RepositoryError` rather than constructing
/// anything.
///
/// Cheap to clone: every clone shares the same repository, lock registry,
/// and id counter via `Rc`, so cloning a factory is how callers build
/// several independent façades (several [`Session`](crate::Transaction)s,
/// a `TransactionDict`) over one underlying store.
pub struct TransactionFactory<K, V> {
    strategy: Strategy,
    next_id: Rc<Cell<u64>>,
    repo: Rc<RefCell<JournalRepository<K, V>>>,
    protector: Rc<RefCell<AccessProtector<K>>>,
}

impl<K, V> Clone for TransactionFactory<K, V> {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy,
            next_id: self.next_id.clone(),
            repo: self.repo.clone(),
            protector: self.protector.clone(),
        }
    }
}

impl<K, V> TransactionFactory<K, V>
where
    K: Eq + Hash + Clone + Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    /// Builds a factory for `strategy`, with its own fresh repository and
    /// lock registry.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            next_id: Rc::new(Cell::new(1)),
            repo: Rc::new(RefCell::new(JournalRepository::new())),
            protector: Rc::new(RefCell::new(AccessProtector::new())),
        }
    }

    /// The strategy this factory builds transactions for.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Builds a not-yet-started transaction at `isolation_level`.
    ///
    /// Fails with `RepositoryError` if this factory's strategy is
    /// multi-version and `isolation_level` is read-uncommitted.
    pub fn create(&self, isolation_level: IsolationLevel) -> Result<Transaction<K, V>> {
        if self.strategy == Strategy::MultiVersion
            && isolation_level == IsolationLevel::ReadUncommitted
        {
            return Err(Error::RepositoryError(
                "multi-version strategy does not implement read-uncommitted".into(),
            ));
        }
        let id = TxId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        Ok(match self.strategy {
            Strategy::Lock => Transaction::for_lock_strategy(
                id,
                isolation_level,
                self.repo.clone(),
                self.protector.clone(),
            ),
            Strategy::MultiVersion => {
                Transaction::for_multi_version_strategy(id, isolation_level, self.repo.clone())
            }
        })
    }
}
