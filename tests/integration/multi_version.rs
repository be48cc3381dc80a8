//! Multi-version isolation scenarios (spec.md S5-S8), driven through
//! `TransactionFactory`.

use crate::common::*;

#[test]
fn s5_write_write_conflict_fails_the_loser_at_commit() {
    init_tracing();
    let factory = factory_with(Strategy::MultiVersion, "k1", 1);

    let t1 = factory.create(IsolationLevel::ReadCommitted).unwrap();
    let t2 = factory.create(IsolationLevel::ReadCommitted).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    t1.set("k1", 2).unwrap();
    t2.set("k1", 3).unwrap();
    t2.commit().unwrap();

    let err = t1.commit().unwrap_err();
    assert!(matches!(err, Error::SerializationError(_)));
    // the transaction remains usable after a rejected commit
    t1.rollback().unwrap();
}

#[test]
fn s6_repeatable_read_snapshot_is_frozen_until_its_own_commit() {
    init_tracing();
    let factory = factory_with(Strategy::MultiVersion, "k1", 1);

    let t1 = factory.create(IsolationLevel::RepeatableRead).unwrap();
    let t2 = factory.create(IsolationLevel::RepeatableRead).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    t2.set("k1", 2).unwrap();
    t2.commit().unwrap();

    assert_eq!(t1.get(&"k1").unwrap(), 1);
    t1.commit().unwrap();
    // After its own commit, the watermark refreshes.
    assert_eq!(t1.get(&"k1").unwrap(), 2);
}

#[test]
fn s7_serializable_phantom_by_len_is_rejected() {
    init_tracing();
    let factory = TransactionFactory::new(Strategy::MultiVersion);
    let setup = factory.create(IsolationLevel::ReadCommitted).unwrap();
    setup.start().unwrap();
    setup.set("k1", 1).unwrap();
    setup.set("k2", 2).unwrap();
    setup.commit().unwrap();

    let t1 = factory.create(IsolationLevel::Serializable).unwrap();
    let t2 = factory.create(IsolationLevel::Serializable).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    assert_eq!(t1.len().unwrap(), 2);
    t2.set("k3", 3).unwrap();
    t2.commit().unwrap();

    let err = t1.commit().unwrap_err();
    assert!(matches!(err, Error::SerializationError(_)));
}

#[test]
fn s8_length_stable_concurrent_edit_is_admitted() {
    init_tracing();
    let factory = TransactionFactory::new(Strategy::MultiVersion);
    let setup = factory.create(IsolationLevel::ReadCommitted).unwrap();
    setup.start().unwrap();
    setup.set("k1", 1).unwrap();
    setup.set("k2", 2).unwrap();
    setup.commit().unwrap();

    let t1 = factory.create(IsolationLevel::Serializable).unwrap();
    let t2 = factory.create(IsolationLevel::Serializable).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    assert_eq!(t1.len().unwrap(), 2);
    t2.set("k3", 3).unwrap();
    t2.delete(&"k2").unwrap();
    t2.commit().unwrap();

    // Net length unchanged across the snapshot boundary: admitted.
    t1.commit().unwrap();
}

#[test]
fn multi_version_rejects_read_uncommitted_at_the_factory() {
    let factory: TransactionFactory<&str, i32> = TransactionFactory::new(Strategy::MultiVersion);
    let err = factory.create(IsolationLevel::ReadUncommitted).unwrap_err();
    assert!(matches!(err, Error::RepositoryError(_)));
}

#[test]
fn full_scan_conflicts_with_any_later_commit_under_serializable() {
    init_tracing();
    let factory = factory_with(Strategy::MultiVersion, "k1", 1);

    let t1 = factory.create(IsolationLevel::Serializable).unwrap();
    let t2 = factory.create(IsolationLevel::Serializable).unwrap();
    t1.start().unwrap();
    t2.start().unwrap();

    let _ = t1.iter().unwrap();
    t2.set("k2", 2).unwrap();
    t2.commit().unwrap();

    let err = t1.commit().unwrap_err();
    assert!(matches!(err, Error::SerializationError(_)));
}
