//! Core data model for the transactional key-value engine.
//!
//! This crate defines the pieces that do not depend on any particular
//! concurrency-control strategy:
//! - [`Cell`]: a value or a tombstone.
//! - [`Journal`] and its mutable/leaf/composite shapes: the key -> cell
//!   mapping abstraction every isolation level composes differently.
//! - [`Error`]: the error taxonomy surfaced at the transaction boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod error;
pub mod journal;

pub use cell::Cell;
pub use error::{Error, Result};
pub use journal::{CompositeJournal, Journal, LeafJournal, MutableJournal};
