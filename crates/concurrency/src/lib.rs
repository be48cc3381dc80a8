//! Transaction lifecycle, lock-based and multi-version conflict detection.
//!
//! This crate builds the transaction abstraction on top of `txkv-core`'s
//! journal algebra: [`JournalRepository`] aggregates the per-transaction
//! write journals (C2) and the committed log (C3); [`AccessProtector`] is
//! the no-wait lock registry the lock-based isolation levels use;
//! [`Transaction`] implements both strategies' read-view composition and
//! conflict detection; [`TransactionFactory`] wires the two strategies to
//! the four isolation levels.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod access_protector;
pub mod committed_log;
pub mod factory;
pub mod ids;
pub mod isolation;
pub mod repository;
pub mod transaction;
pub mod uncommitted_store;

pub use access_protector::AccessProtector;
pub use committed_log::{CommittedItem, CommittedLog};
pub use factory::TransactionFactory;
pub use ids::TxId;
pub use isolation::{IsolationLevel, Strategy};
pub use repository::JournalRepository;
pub use transaction::Transaction;
pub use uncommitted_store::UncommittedStore;
