//! `Session` and `TransactionDict` driving a shared store through a cloned
//! `TransactionFactory` — the façade-level counterpart to the engine-level
//! scenarios in `lock_strategy` and `multi_version`.

use crate::common::*;

#[test]
fn transaction_dict_is_auto_commit_read_committed() {
    init_tracing();
    let dict: TransactionDict<&str, i32> = TransactionDict::new(Strategy::Lock);
    dict.set("a", 1).unwrap();
    assert_eq!(dict.get(&"a").unwrap(), 1);
    dict.delete(&"a").unwrap();
    assert!(matches!(dict.get(&"a").unwrap_err(), Error::NotFound));
}

#[test]
fn session_requires_an_explicit_begin() {
    init_tracing();
    let mut session: Session<&str, i32> = Session::new(Strategy::Lock);
    assert!(matches!(
        session.set("a", 1).unwrap_err(),
        Error::SessionError(_)
    ));
    session.begin(IsolationLevel::ReadCommitted).unwrap();
    assert!(matches!(
        session.begin(IsolationLevel::ReadCommitted).unwrap_err(),
        Error::SessionError(_)
    ));
    session.set("a", 1).unwrap();
    session.commit().unwrap();
    assert!(!session.is_open());
}

#[test]
fn a_dict_and_a_session_sharing_a_factory_see_each_others_commits() {
    init_tracing();
    let factory: TransactionFactory<&str, i32> = TransactionFactory::new(Strategy::Lock);
    let dict = TransactionDict::from_factory(factory.clone());
    let mut session = Session::from_factory(factory);

    dict.set("shared", 1).unwrap();

    session.begin(IsolationLevel::ReadCommitted).unwrap();
    assert_eq!(session.get(&"shared").unwrap(), 1);
    session.set("shared", 2).unwrap();
    session.commit().unwrap();

    assert_eq!(dict.get(&"shared").unwrap(), 2);
}

#[test]
fn session_commit_conflict_leaves_the_transaction_open_for_retry() {
    init_tracing();
    let factory: TransactionFactory<&str, i32> = TransactionFactory::new(Strategy::MultiVersion);
    let mut a = Session::from_factory(factory.clone());
    let mut b = Session::from_factory(factory);

    a.begin(IsolationLevel::ReadCommitted).unwrap();
    b.begin(IsolationLevel::ReadCommitted).unwrap();
    a.set("k", 1).unwrap();
    b.set("k", 2).unwrap();
    b.commit().unwrap();

    let err = a.commit().unwrap_err();
    assert!(matches!(err, Error::SerializationError(_)));
    assert!(a.is_open());
    a.rollback().unwrap();
}

#[test]
fn session_rollback_without_an_open_transaction_is_a_session_error() {
    init_tracing();
    let mut session: Session<&str, i32> = Session::new(Strategy::Lock);
    assert!(matches!(
        session.rollback().unwrap_err(),
        Error::SessionError(_)
    ));
}
