//! The configuration surface: isolation levels and concurrency-control
//! strategies.

/// The four selectable isolation levels.
///
/// Multi-version does not implement read-uncommitted — see
/// [`crate::TransactionFactory::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    /// Sees other transactions' uncommitted writes.
    ReadUncommitted,
    /// Sees only committed writes plus its own.
    ReadCommitted,
    /// Read-committed, plus the reads it has already taken stay stable.
    RepeatableRead,
    /// Repeatable-read, plus protection against phantom inserts/deletes.
    Serializable,
}

/// The two concurrency-control strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Pessimistic: explicit key/range locks, fails fast at the conflicting
    /// operation.
    Lock,
    /// Optimistic: multi-version snapshots, fails at commit time.
    MultiVersion,
}
