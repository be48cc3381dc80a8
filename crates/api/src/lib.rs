//! Façades over the `txkv-concurrency` engine.
//!
//! These are deliberately thin: [`TransactionDict`] and [`Session`] are
//! specified only as collaborators at the engine's boundary, not part of
//! the core transactional machinery. Both wrap a
//! [`TransactionFactory`](txkv_concurrency::TransactionFactory); neither
//! adds any conflict-detection or isolation logic of its own.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod session;
pub mod transaction_dict;

pub use session::Session;
pub use transaction_dict::TransactionDict;
