//! # txkv
//!
//! An in-process transactional key-value store with four selectable
//! isolation levels (read-uncommitted, read-committed, repeatable-read,
//! serializable) and two concurrency-control strategies: a pessimistic
//! one based on explicit key/range locks that fails concurrent
//! conflicting operations immediately, and an optimistic one based on
//! multi-version snapshots that fails at commit time with a
//! serialization error.
//!
//! # Quick start
//!
//! ```
//! use txkv::{Strategy, TransactionDict};
//!
//! let dict: TransactionDict<&str, i32> = TransactionDict::new(Strategy::Lock);
//! dict.set("a", 1).unwrap();
//! assert_eq!(dict.get(&"a").unwrap(), 1);
//! ```
//!
//! For multi-statement transactions, use [`Session`] (at most one open
//! transaction at a time) or build [`Transaction`]s directly from a
//! [`TransactionFactory`]:
//!
//! ```
//! use txkv::{IsolationLevel, Strategy, TransactionFactory};
//!
//! let factory: TransactionFactory<&str, i32> = TransactionFactory::new(Strategy::MultiVersion);
//! let tx = factory.create(IsolationLevel::Serializable).unwrap();
//! tx.start().unwrap();
//! tx.set("a", 1).unwrap();
//! tx.commit().unwrap();
//! ```
//!
//! # Architecture
//!
//! The transactional core — the journal data model, read-view
//! composition per isolation level, and the two conflict detectors —
//! lives in `txkv-core` (data model) and `txkv-concurrency` (transaction
//! lifecycle and conflict detection). This crate re-exports that surface
//! plus the two façades built on it: [`TransactionDict`] (auto-commit,
//! always read-committed) and [`Session`] (one explicitly managed
//! transaction at a time). Internal crates are not otherwise exposed.

pub use txkv_api::{Session, TransactionDict};
pub use txkv_concurrency::{
    AccessProtector, CommittedItem, CommittedLog, IsolationLevel, Strategy, Transaction,
    TransactionFactory, TxId, UncommittedStore,
};
pub use txkv_core::{Cell, CompositeJournal, Error, Journal, LeafJournal, MutableJournal, Result};
