//! Admin key recovery

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use common::Ledger;
use msb_apply::{MembershipChange, Rejection};
use msb_testkit::{tokens, writer_key_from_seed, Participant};

fn with_validator() -> (Ledger, Participant) {
    let mut ledger = Ledger::bootstrapped();
    let alice = Participant::from_seed_string("alice");
    ledger.onboard_writer(&alice, tokens(100));
    (ledger, alice)
}

#[test]
fn recovery_rotates_the_admin_key() {
    let (mut ledger, alice) = with_validator();
    let admin = ledger.admin.clone();
    let old_key = admin.writing_key();
    let new_key = writer_key_from_seed("admin-recovered");

    let op = ledger.factory.admin_recovery(&admin, new_key, &alice);
    let report = ledger.applied(op);
    assert_eq!(
        report.membership.changes(),
        &[MembershipChange::Add(new_key), MembershipChange::Remove(old_key)]
    );
    assert!(ledger.replica.membership().contains(&new_key));
    assert!(!ledger.replica.membership().contains(&old_key));

    let reader = ledger.replica.reader();
    assert_eq!(reader.admin().unwrap().unwrap().writing_key, new_key);
    assert_eq!(reader.writer_owner(&new_key).unwrap().as_ref(), Some(admin.address()));
    assert_eq!(ledger.replica.node(admin.address()).unwrap().writing_key, new_key);

    let bob = Participant::from_seed_string("bob");
    let op = ledger.factory.append_whitelist(&admin, bob.address());
    assert_eq!(ledger.rejected(op), Rejection::NotAdmin);

    let recovered = admin.with_writing_key(new_key);
    let op = ledger.factory.append_whitelist(&recovered, bob.address());
    ledger.applied(op);
}

#[test]
fn recovery_requires_the_admin_key_in_membership() {
    let (mut ledger, alice) = with_validator();
    let admin = ledger.admin.clone();
    let op = ledger.factory.add_indexer(&admin, alice.address());
    ledger.applied(op);
    let op = ledger.factory.remove_indexer(&admin, admin.address());
    ledger.applied(op);
    assert!(!ledger.replica.membership().contains(&admin.writing_key()));

    let op = ledger
        .factory
        .admin_recovery(&admin, writer_key_from_seed("admin-recovered"), &alice);
    assert_eq!(ledger.rejected(op), Rejection::AdminKeyNotMember);
}

#[test]
fn recovery_needs_an_independent_validator_and_a_fresh_key() {
    let (mut ledger, alice) = with_validator();
    let admin = ledger.admin.clone();

    let op = ledger
        .factory
        .admin_recovery(&admin, writer_key_from_seed("admin-recovered"), &admin);
    assert_eq!(ledger.rejected(op), Rejection::ValidatorIsRequester);

    let op = ledger
        .factory
        .admin_recovery(&admin, alice.writing_key(), &alice);
    assert_eq!(ledger.rejected(op), Rejection::WriterKeyInUse);

    let op = ledger
        .factory
        .admin_recovery(&alice, writer_key_from_seed("stolen"), &alice);
    assert_eq!(ledger.rejected(op), Rejection::NotAdmin);
}
