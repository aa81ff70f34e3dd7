//! Transfers, fee settlement, authentication and replay

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use assert_matches::assert_matches;
use common::Ledger;
use msb_apply::{ApplyError, Rejection};
use msb_core::{crypto, RoleMask};
use msb_ops::{assembly, OperationBody, OperationKind};
use msb_testkit::{amount, deliver, tokens, OperationFactory, Participant};

fn funded() -> (Ledger, Participant, Participant) {
    let mut ledger = Ledger::bootstrapped();
    let admin = ledger.admin.clone();
    let alice = Participant::from_seed_string("alice");
    let carol = Participant::from_seed_string("carol");
    let op = ledger
        .factory
        .balance_initialization(&admin, alice.address(), tokens(100));
    ledger.applied(op);
    (ledger, alice, carol)
}

#[test]
fn transfer_succeeds_then_fails_on_insufficient_balance() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();

    let op = ledger.factory.transfer(&alice, carol.address(), tokens(30), &admin);
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(alice.address()), amount("69.97"));
    assert_eq!(ledger.replica.balance(carol.address()), tokens(30));
    assert_eq!(ledger.replica.balance(admin.address()), amount("1000.0225"));
    assert_eq!(ledger.replica.node(carol.address()).unwrap().role, RoleMask::NONE);

    let op = ledger
        .factory
        .transfer(&alice, carol.address(), amount("69.97"), &admin);
    let report = ledger.apply(op);
    let outcome = &report.outcomes[0];
    assert_eq!(
        outcome.result.as_ref().err().and_then(ApplyError::rejection),
        Some(Rejection::InsufficientBalance)
    );
    assert!(!ledger
        .replica
        .reader()
        .is_applied(&outcome.tx.unwrap())
        .unwrap());
    assert_eq!(ledger.replica.balance(alice.address()), amount("69.97"));
    assert_eq!(ledger.replica.balance(carol.address()), tokens(30));

    let op = ledger
        .factory
        .transfer(&alice, carol.address(), amount("69.94"), &admin);
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(alice.address()), tokens(0));
    assert_eq!(ledger.replica.balance(carol.address()), amount("99.94"));
}

#[test]
fn self_transfer_only_costs_the_fee() {
    let (mut ledger, alice, _) = funded();
    let admin = ledger.admin.clone();
    let op = ledger.factory.transfer(&alice, alice.address(), tokens(40), &admin);
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(alice.address()), amount("99.97"));
}

#[test]
fn admin_transfers_free_during_initialization_without_self_reward() {
    let (mut ledger, _, carol) = funded();
    let admin = ledger.admin.clone();
    let op = ledger.factory.transfer(&admin, carol.address(), tokens(5), &admin);
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(admin.address()), tokens(995));

    ledger.disable_initialization();
    let op = ledger.factory.transfer(&admin, carol.address(), tokens(5), &admin);
    ledger.applied(op);
    assert_eq!(ledger.replica.balance(admin.address()), amount("989.97"));
    assert_eq!(ledger.replica.balance(carol.address()), tokens(10));
}

#[test]
fn validator_must_own_the_delivering_log() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();
    let bob = Participant::from_seed_string("bob");
    ledger.onboard_writer(&bob, tokens(50));

    let op = ledger
        .factory
        .cosigned(OperationKind::Transfer, transfer_body(&carol), &alice, &bob);
    assert_eq!(
        ledger.rejected(deliver(&op, admin.writing_key())),
        Rejection::ValidatorKeyMismatch
    );

    let op = ledger
        .factory
        .cosigned(OperationKind::Transfer, transfer_body(&carol), &alice, &carol);
    assert_eq!(
        ledger.rejected(deliver(&op, carol.writing_key())),
        Rejection::ValidatorNotWriter
    );

    let op = ledger
        .factory
        .cosigned(OperationKind::Transfer, transfer_body(&carol), &alice, &bob);
    ledger.applied(deliver(&op, bob.writing_key()));
    assert_eq!(ledger.replica.balance(bob.address()), amount("39.9925"));
}

fn transfer_body(recipient: &Participant) -> OperationBody {
    OperationBody::Transfer {
        recipient: recipient.address().clone(),
        amount: tokens(1),
    }
}

#[test]
fn partial_operations_are_rejected() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();
    let op = ledger
        .factory
        .signed(OperationKind::Transfer, transfer_body(&carol), &alice);
    assert_eq!(
        ledger.rejected(deliver(&op, admin.writing_key())),
        Rejection::MissingCosignature
    );
}

#[test]
fn tampered_operations_fail_authentication() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();

    let mut op = ledger
        .factory
        .cosigned(OperationKind::Transfer, transfer_body(&carol), &alice, &admin);
    op.body = OperationBody::Transfer {
        recipient: carol.address().clone(),
        amount: tokens(90),
    };
    assert_eq!(
        ledger.rejected(deliver(&op, admin.writing_key())),
        Rejection::HashMismatch
    );

    let mut op = ledger
        .factory
        .cosigned(OperationKind::Transfer, transfer_body(&carol), &alice, &admin);
    op.signature = msb_core::SignatureBytes::new([1u8; 64]);
    assert_eq!(
        ledger.rejected(deliver(&op, admin.writing_key())),
        Rejection::InvalidSignature
    );

    let mut op = ledger
        .factory
        .cosigned(OperationKind::Transfer, transfer_body(&carol), &alice, &admin);
    if let Some(cosign) = op.cosign.as_mut() {
        cosign.nonce = msb_core::Nonce::new([3u8; 32]);
    }
    assert_eq!(
        ledger.rejected(deliver(&op, admin.writing_key())),
        Rejection::InvalidValidatorSignature
    );
    assert_eq!(ledger.replica.balance(alice.address()), tokens(100));
}

#[test]
fn stale_tx_validity_is_rejected() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();
    let mut stale = OperationFactory::new(11, crypto::hash(b"some older membership"));
    let op = stale.transfer(&alice, carol.address(), tokens(1), &admin);
    assert_eq!(ledger.rejected(op), Rejection::StaleTxValidity);
}

#[test]
fn replayed_operations_have_no_effect() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();
    let op = ledger.factory.transfer(&alice, carol.address(), tokens(10), &admin);

    let report = ledger.replica.apply(&[op.clone(), op.clone()]);
    assert!(report.outcomes[0].is_applied());
    assert_matches!(report.outcomes[1].result, Err(ApplyError::Replay(_)));
    let after_first = ledger.replica.store().clone();

    let report = ledger.apply(op.clone());
    assert_matches!(report.outcomes[0].result, Err(ApplyError::Replay(_)));
    assert_eq!(ledger.replica.store(), &after_first);
    assert_eq!(ledger.replica.balance(carol.address()), tokens(10));

    let tx = report.outcomes[0].tx.unwrap();
    let recorded = ledger.replica.reader().applied_operation(&tx).unwrap();
    assert_eq!(recorded, Some(op.value));
}

#[test]
fn replay_is_reported_even_after_membership_moves_on() {
    let (mut ledger, alice, carol) = funded();
    let admin = ledger.admin.clone();
    let op = ledger.factory.transfer(&alice, carol.address(), tokens(10), &admin);
    ledger.applied(op.clone());

    ledger.replica.set_tx_validity(crypto::hash(b"next membership"));
    let report = ledger.apply(op);
    assert_matches!(report.outcomes[0].result, Err(ApplyError::Replay(_)));
}

#[test]
fn wire_bytes_round_trip_through_the_engine() {
    let (ledger, alice, carol) = funded();
    let mut factory = OperationFactory::new(3, msb_testkit::test_tx_validity());
    let op = factory.cosigned(
        OperationKind::Transfer,
        transfer_body(&carol),
        &alice,
        &ledger.admin,
    );
    let bytes = assembly::encode(&op).unwrap();
    assert!(msb_ops::is_valid(&msb_ops::RawOperation::decode(&bytes).unwrap()));
}
