//! The error taxonomy surfaced at the transaction boundary.

use thiserror::Error;

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by journals, transactions, and the façades built on them.
///
/// Only [`Error::RepositoryError`] and [`Error::SessionError`] indicate a
/// programmer error and should generally propagate. The other three are
/// normal control flow under contention: callers are expected to inspect
/// [`Error::is_contention`] and decide whether to retry.
#[derive(Debug, Error)]
pub enum Error {
    /// The key is absent, or its most recent cell in the composed view is a
    /// tombstone.
    #[error("key not found")]
    NotFound,

    /// A lock acquisition conflicted with a lock already held by another
    /// transaction.
    #[error("access conflict: {0}")]
    AccessError(String),

    /// A multi-version transaction failed its commit-time conflict check.
    #[error("serialization conflict: {0}")]
    SerializationError(String),

    /// An engine-contract violation, e.g. creating an uncommitted journal
    /// twice for the same transaction, or operating on a transaction that
    /// has not been started or has already ended.
    #[error("repository error: {0}")]
    RepositoryError(String),

    /// The session façade was asked to open a transaction while one was
    /// already open, or to operate when none was open.
    #[error("session error: {0}")]
    SessionError(String),
}

impl Error {
    /// True for the two conflict errors that are normal control flow under
    /// contention and may reasonably be retried by the caller.
    pub fn is_contention(&self) -> bool {
        matches!(self, Error::AccessError(_) | Error::SerializationError(_))
    }

    /// True for the two errors that indicate a programmer error rather than
    /// contention.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::RepositoryError(_) | Error::SessionError(_))
    }
}
