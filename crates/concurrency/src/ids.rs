//! The opaque transaction handle.

/// An opaque handle identifying a transaction, allocated by
/// [`crate::TransactionFactory`].
///
/// Replaces the original source's use of object identity: the journal
/// repository and lock registry key off this handle rather than a
/// transaction's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(pub(crate) u64);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx#{}", self.0)
    }
}
