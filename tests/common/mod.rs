//! Shared test utilities for the integration suite.

#![allow(dead_code)]

use std::sync::Once;

pub use txkv::{
    Error, IsolationLevel, Result, Session, Strategy, Transaction, TransactionDict,
    TransactionFactory,
};

static INIT_TRACING: Once = Once::new();

/// Installs a `tracing` subscriber once per test binary, so assertions that
/// fail mid-scenario can be re-run with `RUST_LOG=debug` to see the
/// engine's commit/conflict log lines.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// A factory with one key already committed via a throwaway setup
/// transaction, read-committed under `strategy`.
pub fn factory_with(
    strategy: Strategy,
    key: &'static str,
    value: i32,
) -> TransactionFactory<&'static str, i32> {
    let factory = TransactionFactory::new(strategy);
    let setup = factory.create(IsolationLevel::ReadCommitted).unwrap();
    setup.start().unwrap();
    setup.set(key, value).unwrap();
    setup.commit().unwrap();
    factory
}
