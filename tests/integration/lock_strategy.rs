//! Lock-strategy isolation scenarios (spec.md S1-S4), driven through
//! `TransactionFactory` rather than the concurrency crate's own internal
//! unit tests — this exercises the same behavior through the crate's
//! public surface.

use crate::common::*;

#[test]
fn s1_read_committed_second_writer_is_rejected() {
    init_tracing();
    let factory = factory_with(Strategy::Lock, "k1", 1);

    let t1 = factory.create(IsolationLevel::ReadCommitted).unwrap();
    let t2 = factory.create(IsolationLevel::ReadCommitted).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    t1.set("k1", 2).unwrap();
    let err = t2.set("k1", 3).unwrap_err();
    assert!(matches!(err, Error::AccessError(_)));
    assert_eq!(t1.get(&"k1").unwrap(), 2);

    t1.commit().unwrap();
    t2.end().unwrap();
}

#[test]
fn s2_read_uncommitted_sees_pending_writes_and_their_rollback() {
    init_tracing();
    let factory = factory_with(Strategy::Lock, "k1", 1);

    let t1 = factory.create(IsolationLevel::ReadUncommitted).unwrap();
    let t2 = factory.create(IsolationLevel::ReadUncommitted).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    assert_eq!(t1.get(&"k1").unwrap(), 1);
    t2.set("k1", 2).unwrap();
    assert_eq!(t1.get(&"k1").unwrap(), 2);
    t2.rollback().unwrap();
    assert_eq!(t1.get(&"k1").unwrap(), 1);
    t1.end().unwrap();
}

#[test]
fn s3_repeatable_read_locks_on_get_blocks_concurrent_writer() {
    init_tracing();
    let factory = factory_with(Strategy::Lock, "k1", 1);

    let t1 = factory.create(IsolationLevel::RepeatableRead).unwrap();
    let t2 = factory.create(IsolationLevel::RepeatableRead).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    assert_eq!(t1.get(&"k1").unwrap(), 1);
    let err = t2.set("k1", 2).unwrap_err();
    assert!(matches!(err, Error::AccessError(_)));
    t1.end().unwrap();
    t2.end().unwrap();
}

#[test]
fn s4_serializable_len_takes_a_full_lock_blocking_any_write() {
    init_tracing();
    let factory = factory_with(Strategy::Lock, "k1", 1);

    let t1 = factory.create(IsolationLevel::Serializable).unwrap();
    let t2 = factory.create(IsolationLevel::Serializable).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    assert_eq!(t1.len().unwrap(), 1);
    let err = t2.set("k3", 3).unwrap_err();
    assert!(matches!(err, Error::AccessError(_)));
    t1.end().unwrap();
    t2.end().unwrap();
}

#[test]
fn contains_under_repeatable_read_locks_the_calling_transaction_not_the_key() {
    // Regresses the original source's bug (SPEC_FULL.md Open Question 2):
    // the lock must be owned by the caller, so a second transaction's
    // `contains` on the same key must also conflict, and the lock must
    // never be attributed to anything derived from the key itself.
    init_tracing();
    let factory = factory_with(Strategy::Lock, "k1", 1);

    let t1 = factory.create(IsolationLevel::RepeatableRead).unwrap();
    let t2 = factory.create(IsolationLevel::RepeatableRead).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    assert!(t1.contains(&"k1").unwrap());
    let err = t2.delete(&"k1").unwrap_err();
    assert!(matches!(err, Error::AccessError(_)));
    t1.end().unwrap();
    t2.end().unwrap();
}

#[test]
fn no_wait_locking_never_blocks_it_fails_fast() {
    init_tracing();
    let factory = factory_with(Strategy::Lock, "k1", 1);
    let t1 = factory.create(IsolationLevel::ReadCommitted).unwrap();
    let t2 = factory.create(IsolationLevel::ReadCommitted).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    t1.set("k1", 2).unwrap();
    // The conflicting attempt returns immediately rather than parking;
    // there is nothing here that could deadlock.
    assert!(t2.set("k1", 3).is_err());
    t1.commit().unwrap();
    t2.end().unwrap();
}
