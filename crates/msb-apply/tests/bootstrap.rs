//! Admin registration and the initialization phase

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use assert_matches::assert_matches;
use common::Ledger;
use msb_apply::{ApplyError, Rejection};
use msb_core::RoleMask;
use msb_testkit::{amount, tokens, Participant};

#[test]
fn add_admin_seeds_the_ledger() {
    let ledger = Ledger::bootstrapped();
    let admin = ledger.admin.address().clone();
    let reader = ledger.replica.reader();

    let record = reader.admin().unwrap().unwrap();
    assert_eq!(record.address, admin);
    assert_eq!(record.writing_key, ledger.admin.writing_key());

    let node = ledger.replica.node(&admin).unwrap();
    assert_eq!(node.role, RoleMask::INDEXER);
    assert_eq!(node.balance, tokens(1000));
    assert_eq!(node.staked_balance, tokens(10));
    assert_eq!(node.license, 1);
    assert_eq!(node.writing_key, ledger.admin.writing_key());

    assert!(reader.initialization_enabled().unwrap());
    assert_eq!(reader.license_count().unwrap(), 1);
    assert_eq!(reader.license_owner(1).unwrap(), Some(admin.clone()));
    assert_eq!(reader.writers_length().unwrap(), 1);
    assert_eq!(reader.writer_at(0).unwrap(), Some(admin.clone()));
    assert_eq!(
        reader.writer_owner(&ledger.admin.writing_key()).unwrap(),
        Some(admin)
    );
}

#[test]
fn add_admin_only_once_and_only_from_bootstrap() {
    let mut ledger = Ledger::bootstrapped();
    let admin = ledger.admin.clone();
    let op = ledger.factory.add_admin(&admin);
    assert_eq!(ledger.rejected(op), Rejection::AdminExists);

    let mut fresh = Ledger::new();
    let impostor = Participant::from_seed_string("impostor");
    let op = fresh.factory.add_admin(&impostor);
    assert_eq!(fresh.rejected(op), Rejection::NotBootstrapWriter);
    assert!(fresh.replica.store().is_empty());
}

#[test]
fn admin_operations_need_an_admin() {
    let mut ledger = Ledger::new();
    let admin = ledger.admin.clone();
    let alice = Participant::from_seed_string("alice");
    let op = ledger.factory.append_whitelist(&admin, alice.address());
    assert_eq!(ledger.rejected(op), Rejection::NoAdmin);
}

#[test]
fn admin_only_kinds_reject_other_requesters() {
    let mut ledger = Ledger::bootstrapped();
    let mallory = Participant::from_seed_string("mallory");
    let op = ledger.factory.append_whitelist(&mallory, mallory.address());
    assert_eq!(ledger.rejected(op), Rejection::NotAdmin);
}

#[test]
fn initialization_is_one_way() {
    let mut ledger = Ledger::bootstrapped();
    let admin = ledger.admin.clone();
    let alice = Participant::from_seed_string("alice");

    let op = ledger
        .factory
        .balance_initialization(&admin, alice.address(), tokens(50));
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(alice.address()), tokens(50));
    assert_eq!(ledger.replica.balance(admin.address()), tokens(1000));

    ledger.disable_initialization();
    assert!(!ledger.replica.reader().initialization_enabled().unwrap());

    let op = ledger
        .factory
        .balance_initialization(&admin, alice.address(), tokens(50));
    assert_eq!(ledger.rejected(op), Rejection::InitializationDisabled);
    let op = ledger.factory.disable_initialization(&admin);
    assert_eq!(ledger.rejected(op), Rejection::InitializationDisabled);
    assert_eq!(ledger.replica.balance(alice.address()), tokens(50));
}

#[test]
fn admin_pays_fees_once_initialization_is_closed() {
    let mut ledger = Ledger::bootstrapped();
    let admin = ledger.admin.clone();
    let alice = Participant::from_seed_string("alice");

    let op = ledger.factory.append_whitelist(&admin, alice.address());
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(admin.address()), tokens(1000));

    ledger.disable_initialization();
    assert_eq!(ledger.replica.balance(admin.address()), tokens(1000));

    let bob = Participant::from_seed_string("bob");
    let op = ledger.factory.append_whitelist(&admin, bob.address());
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(admin.address()), amount("999.97"));
}

#[test]
fn undecodable_and_malformed_operations_are_skipped() {
    let mut ledger = Ledger::bootstrapped();
    let admin = ledger.admin.clone();
    let alice = Participant::from_seed_string("alice");

    let unknown_kind = msb_ops::RawOperation {
        kind: 99,
        address: Some(admin.address().as_bytes().to_vec()),
        payload: msb_ops::RawPayload::empty(msb_ops::PayloadFamily::AdminControl),
    }
    .encode()
    .unwrap();

    let garbage = msb_apply::DeliveredOperation::new(admin.writing_key(), vec![0xff; 7]);
    let malformed = msb_apply::DeliveredOperation::new(admin.writing_key(), unknown_kind);
    let valid = ledger.factory.append_whitelist(&admin, alice.address());

    let report = ledger.replica.apply(&[garbage, malformed, valid]);
    assert_matches!(report.outcomes[0].result, Err(ApplyError::Decode(_)));
    assert_matches!(report.outcomes[1].result, Err(ApplyError::Schema(_)));
    assert!(report.outcomes[2].is_applied());
    assert_eq!(report.applied(), 1);
    assert!(ledger.replica.node(alice.address()).unwrap().is_whitelisted());
}
