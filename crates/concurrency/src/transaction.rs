//! The two transaction families: lock-based and multi-version.
//!
//! Both families share the same public surface (`get`/`set`/`delete`/
//! `contains`/`iter`/`len`/`commit`/`rollback`/`start`/`end`) and the same
//! [`JournalRepository`]; they differ only in which journals their read
//! view composes, which operations acquire locks, and what runs at commit
//! time. Rather than one Rust type per isolation level (the original
//! source's seven subclasses), a single [`Transaction`] dispatches on an
//! isolation level plus a two-armed `Backend` enum — the isolation level
//! alone decides lock acquisition and read-view shape, and the strategy
//! (carried by `Backend`) decides what commit/rollback/end actually do.

use std::cell::{Cell as StdCell, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use tracing::{debug, warn};
use txkv_core::{Cell as ValueCell, CompositeJournal, Error, Journal, Result};

use crate::access_protector::AccessProtector;
use crate::ids::TxId;
use crate::isolation::IsolationLevel;
use crate::repository::JournalRepository;

/// Per-transaction state specific to the multi-version strategy.
struct MvState {
    /// The committed-log watermark this transaction considers visible.
    target_offset: StdCell<u64>,
    /// Set once `len()` has been called, under serializable only.
    len_block: StdCell<bool>,
    /// Set once `iter()` has run to completion, under serializable only.
    full_block: StdCell<bool>,
}

/// Which concurrency-control strategy backs a transaction.
enum Backend<K> {
    /// Pessimistic: locks shared with every other lock-strategy
    /// transaction built from the same factory.
    Lock(Rc<RefCell<AccessProtector<K>>>),
    /// Optimistic: a private snapshot watermark and observation flags.
    MultiVersion(MvState),
}

/// A single transaction: an isolation level, a backend, and a handle into
/// the shared [`JournalRepository`].
///
/// Constructed only by [`crate::TransactionFactory`]. Must be `start`ed
/// before any read/write, and should be `end`ed on every exit path —
/// dropping a `Transaction` calls `end` automatically, so a `Transaction`
/// behaves like a scope guard even if the caller never calls `end`
/// explicitly.
pub struct Transaction<K, V> {
    id: TxId,
    isolation: IsolationLevel,
    repo: Rc<RefCell<JournalRepository<K, V>>>,
    backend: Backend<K>,
    started: StdCell<bool>,
    ended: StdCell<bool>,
}

impl<K, V> Transaction<K, V>
where
    K: Eq + Hash + Clone + Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    pub(crate) fn for_lock_strategy(
        id: TxId,
        isolation: IsolationLevel,
        repo: Rc<RefCell<JournalRepository<K, V>>>,
        protector: Rc<RefCell<AccessProtector<K>>>,
    ) -> Self {
        Self {
            id,
            isolation,
            repo,
            backend: Backend::Lock(protector),
            started: StdCell::new(false),
            ended: StdCell::new(false),
        }
    }

    pub(crate) fn for_multi_version_strategy(
        id: TxId,
        isolation: IsolationLevel,
        repo: Rc<RefCell<JournalRepository<K, V>>>,
    ) -> Self {
        let target_offset = repo.borrow().last_offset();
        Self {
            id,
            isolation,
            repo,
            backend: Backend::MultiVersion(MvState {
                target_offset: StdCell::new(target_offset),
                len_block: StdCell::new(false),
                full_block: StdCell::new(false),
            }),
            started: StdCell::new(false),
            ended: StdCell::new(false),
        }
    }

    /// This transaction's opaque handle.
    pub fn id(&self) -> TxId {
        self.id
    }

    /// This transaction's isolation level.
    pub fn isolation(&self) -> IsolationLevel {
        self.isolation
    }

    /// Enters the transaction's scope: installs its uncommitted journal.
    /// Fails with `RepositoryError` if already started.
    pub fn start(&self) -> Result<()> {
        if self.started.get() {
            return Err(Error::RepositoryError(format!(
                "{} has already been started",
                self.id
            )));
        }
        self.repo.borrow_mut().create(self.id)?;
        self.started.set(true);
        Ok(())
    }

    /// Ends the transaction's scope: for the lock strategy, rolls back any
    /// pending writes and releases every lock this transaction holds; for
    /// multi-version, simply discards the uncommitted journal (there are
    /// no locks to release, and discarding is what "never commit" means
    /// for a journal nobody will read again). Safe to call more than once
    /// — a second call is a no-op — and called automatically on drop.
    pub fn end(&self) -> Result<()> {
        if self.ended.get() {
            return Ok(());
        }
        match &self.backend {
            Backend::Lock(protector) => {
                let _ = self.repo.borrow_mut().rollback(self.id);
                protector.borrow_mut().release_by(self.id);
            }
            Backend::MultiVersion(_) => {}
        }
        self.repo.borrow_mut().delete_uncommitted(self.id);
        self.ended.set(true);
        Ok(())
    }

    fn require_active(&self) -> Result<()> {
        if !self.started.get() {
            return Err(Error::RepositoryError(format!(
                "{} has not been started",
                self.id
            )));
        }
        if self.ended.get() {
            return Err(Error::RepositoryError(format!("{} has ended", self.id)));
        }
        Ok(())
    }

    /// The composed read view for this transaction's isolation level and
    /// backend. Layers are built from `Rc`-backed handles, so nothing here
    /// holds a borrow of `self.repo` past this call.
    fn state(&self) -> Result<CompositeJournal<K, V>> {
        let repo = self.repo.borrow();
        let layers: Vec<Rc<dyn Journal<K, V>>> = match (&self.backend, self.isolation) {
            (Backend::Lock(_), IsolationLevel::ReadUncommitted) => {
                vec![
                    Rc::new(repo.all_uncommitted_view()) as Rc<dyn Journal<K, V>>,
                    Rc::new(repo.committed_view(0, None)) as Rc<dyn Journal<K, V>>,
                ]
            }
            (Backend::Lock(_), _) => {
                vec![
                    Rc::new(repo.self_view(self.id)?) as Rc<dyn Journal<K, V>>,
                    Rc::new(repo.committed_view(0, None)) as Rc<dyn Journal<K, V>>,
                ]
            }
            (Backend::MultiVersion(_), IsolationLevel::ReadCommitted) => {
                vec![
                    Rc::new(repo.self_view(self.id)?) as Rc<dyn Journal<K, V>>,
                    Rc::new(repo.committed_view(0, None)) as Rc<dyn Journal<K, V>>,
                ]
            }
            (Backend::MultiVersion(mv), _) => {
                vec![
                    Rc::new(repo.self_view(self.id)?) as Rc<dyn Journal<K, V>>,
                    Rc::new(repo.committed_view(0, Some(mv.target_offset.get())))
                        as Rc<dyn Journal<K, V>>,
                ]
            }
        };
        Ok(CompositeJournal::new(layers))
    }

    /// Reads `key`. `Present(v)` becomes `Ok(v)`; an absent key or a
    /// tombstone becomes `Err(NotFound)`.
    pub fn get(&self, key: &K) -> Result<V> {
        self.require_active()?;
        if let Backend::Lock(protector) = &self.backend {
            if matches!(
                self.isolation,
                IsolationLevel::RepeatableRead | IsolationLevel::Serializable
            ) {
                protector.borrow_mut().acquire_key(self.id, key)?;
            }
        }
        let cell = self.state()?.get(key);
        if let Backend::MultiVersion(_) = &self.backend {
            if matches!(self.isolation, IsolationLevel::Serializable) {
                let recorded = match &cell {
                    Some(ValueCell::Present(v)) => ValueCell::Present(v.clone()),
                    _ => ValueCell::Tombstone,
                };
                self.repo.borrow_mut().put(self.id, key.clone(), recorded)?;
            }
        }
        match cell {
            Some(ValueCell::Present(v)) => Ok(v),
            _ => Err(Error::NotFound),
        }
    }

    /// Writes `Present(value)` for `key`.
    pub fn set(&self, key: K, value: V) -> Result<()> {
        self.require_active()?;
        if let Backend::Lock(protector) = &self.backend {
            protector.borrow_mut().acquire_key(self.id, &key)?;
        }
        self.repo.borrow_mut().put(self.id, key, ValueCell::Present(value))
    }

    /// Writes a tombstone for `key`. Fails with `NotFound` if the
    /// composed view does not currently show `key` as present — under
    /// the lock strategy, the key-lock is still acquired first (and
    /// stays held) even when the existence check subsequently fails,
    /// matching the original's lock-then-check ordering.
    pub fn delete(&self, key: &K) -> Result<()> {
        self.require_active()?;
        if let Backend::Lock(protector) = &self.backend {
            protector.borrow_mut().acquire_key(self.id, key)?;
        }
        let exists = matches!(self.state()?.get(key), Some(ValueCell::Present(_)));
        if !exists {
            if let Backend::MultiVersion(_) = &self.backend {
                if matches!(self.isolation, IsolationLevel::Serializable) {
                    self.repo
                        .borrow_mut()
                        .put(self.id, key.clone(), ValueCell::Tombstone)?;
                }
            }
            return Err(Error::NotFound);
        }
        self.repo
            .borrow_mut()
            .put(self.id, key.clone(), ValueCell::Tombstone)
    }

    /// True if `key` is present (not absent, not a tombstone).
    pub fn contains(&self, key: &K) -> Result<bool> {
        self.require_active()?;
        if let Backend::Lock(protector) = &self.backend {
            if matches!(
                self.isolation,
                IsolationLevel::RepeatableRead | IsolationLevel::Serializable
            ) {
                protector.borrow_mut().acquire_key(self.id, key)?;
            }
        }
        let cell = self.state()?.get(key);
        let present = matches!(cell, Some(ValueCell::Present(_)));
        if let Backend::MultiVersion(_) = &self.backend {
            if matches!(self.isolation, IsolationLevel::Serializable) {
                let recorded = match cell {
                    Some(ValueCell::Present(v)) => ValueCell::Present(v),
                    _ => ValueCell::Tombstone,
                };
                self.repo.borrow_mut().put(self.id, key.clone(), recorded)?;
            }
        }
        Ok(present)
    }

    /// The present (non-tombstoned) keys of the composed view, in
    /// first-appearance order. Under the lock strategy this acquires a
    /// key-lock per returned key for repeatable-read, or one full-range
    /// lock for serializable; under multi-version, serializable also
    /// records every yielded key's value as an observation and marks
    /// `full_block`.
    pub fn iter(&self) -> Result<Vec<K>> {
        self.require_active()?;
        if let Backend::Lock(protector) = &self.backend {
            if matches!(self.isolation, IsolationLevel::Serializable) {
                protector.borrow_mut().acquire_full(self.id)?;
            }
        }
        let present: Vec<(K, V)> = self
            .state()?
            .iter()
            .filter_map(|(k, c)| match c {
                ValueCell::Present(v) => Some((k, v)),
                ValueCell::Tombstone => None,
            })
            .collect();
        if let Backend::Lock(protector) = &self.backend {
            if matches!(self.isolation, IsolationLevel::RepeatableRead) {
                for (k, _) in &present {
                    protector.borrow_mut().acquire_key(self.id, k)?;
                }
            }
        }
        if let Backend::MultiVersion(mv) = &self.backend {
            if matches!(self.isolation, IsolationLevel::Serializable) {
                for (k, v) in &present {
                    self.repo
                        .borrow_mut()
                        .put(self.id, k.clone(), ValueCell::Present(v.clone()))?;
                }
                mv.full_block.set(true);
            }
        }
        Ok(present.into_iter().map(|(k, _)| k).collect())
    }

    /// Number of present (non-tombstoned) keys in the composed view.
    /// Under the lock strategy, serializable acquires a full-range lock
    /// first; under multi-version, serializable marks `len_block`.
    pub fn len(&self) -> Result<usize> {
        self.require_active()?;
        if let Backend::Lock(protector) = &self.backend {
            if matches!(self.isolation, IsolationLevel::Serializable) {
                protector.borrow_mut().acquire_full(self.id)?;
            }
        }
        let view = self.state()?;
        let n = view.iter().filter(|(_, c)| c.is_present()).count();
        if let Backend::MultiVersion(mv) = &self.backend {
            if matches!(self.isolation, IsolationLevel::Serializable) {
                mv.len_block.set(true);
            }
        }
        Ok(n)
    }

    /// True if the composed view has no present keys.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Commits this transaction's write journal.
    ///
    /// Lock strategy: appends the journal and releases every lock this
    /// transaction holds. Multi-version: runs the commit-time conflict
    /// check against everything committed since this transaction's
    /// snapshot; on conflict the commit is not applied, the transaction
    /// stays active, and `SerializationError` is returned.
    pub fn commit(&self) -> Result<()> {
        self.require_active()?;
        match &self.backend {
            Backend::Lock(protector) => {
                self.repo.borrow_mut().commit(self.id)?;
                protector.borrow_mut().release_by(self.id);
                debug!(tx = %self.id, "lock-strategy commit");
                Ok(())
            }
            Backend::MultiVersion(mv) => {
                let write_journal = self.repo.borrow().self_view(self.id)?;
                let ahead = self
                    .repo
                    .borrow()
                    .committed_view(mv.target_offset.get() + 1, None);
                if let Err(e) = check_integrity(self.isolation, mv, &write_journal, &ahead) {
                    warn!(tx = %self.id, "multi-version commit rejected: {e}");
                    return Err(e);
                }
                self.repo.borrow_mut().commit(self.id)?;
                mv.target_offset.set(self.repo.borrow().last_offset());
                debug!(tx = %self.id, offset = mv.target_offset.get(), "multi-version commit");
                Ok(())
            }
        }
    }

    /// Discards this transaction's write journal without committing it.
    /// Multi-version also refreshes the snapshot watermark to the
    /// current `last_offset`, so work resumed in the same transaction
    /// after a rollback sees a current snapshot.
    pub fn rollback(&self) -> Result<()> {
        self.require_active()?;
        match &self.backend {
            Backend::Lock(protector) => {
                self.repo.borrow_mut().rollback(self.id)?;
                protector.borrow_mut().release_by(self.id);
                Ok(())
            }
            Backend::MultiVersion(mv) => {
                self.repo.borrow_mut().rollback(self.id)?;
                mv.target_offset.set(self.repo.borrow().last_offset());
                Ok(())
            }
        }
    }
}

impl<K, V> Drop for Transaction<K, V>
where
    K: Eq + Hash + Clone + Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    fn drop(&mut self) {
        let _ = self.end();
    }
}

/// The multi-version commit-time conflict predicate.
///
/// Serializable strengthens the base predicate with two phantom checks
/// evaluated first: a completed full scan (`full_block`) conflicts with
/// *any* non-empty ahead journal; a length observation (`len_block`)
/// conflicts only if the ahead journal's insert/delete balance is
/// non-zero (net length-preserving concurrent edits are admitted — see
/// scenario S8). The base predicate then checks every key this
/// transaction wrote or (under serializable) observed against the ahead
/// journal.
fn check_integrity<K, V>(
    isolation: IsolationLevel,
    mv: &MvState,
    write_journal: &dyn Journal<K, V>,
    ahead: &CompositeJournal<K, V>,
) -> Result<()>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + PartialEq,
{
    if matches!(isolation, IsolationLevel::Serializable) {
        if mv.full_block.get() && !ahead.is_empty() {
            return Err(Error::SerializationError(
                "a completed scan observed keys committed after its snapshot".into(),
            ));
        }
        if mv.len_block.get() {
            let mut counter: i64 = 0;
            for (_, cell) in ahead.iter() {
                match cell {
                    ValueCell::Present(_) => counter += 1,
                    ValueCell::Tombstone => counter -= 1,
                }
            }
            if counter != 0 {
                return Err(Error::SerializationError(
                    "a length observation was invalidated by commits after its snapshot".into(),
                ));
            }
        }
    }
    for (key, cell) in write_journal.iter() {
        if let Some(ahead_cell) = ahead.get(&key) {
            if ahead_cell != cell {
                return Err(Error::SerializationError(format!(
                    "key {key:?} was changed by a commit after this transaction's snapshot"
                )));
            }
        }
    }
    Ok(())
}
