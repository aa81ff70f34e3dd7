//! Property tests for determinism, idempotence and balance conservation

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use common::Ledger;
use msb_apply::DeliveredOperation;
use msb_core::Balance;
use msb_testkit::strategies::{arb_transfer_steps, TransferStep};
use msb_testkit::{amount, test_tx_validity, tokens, OperationFactory, Participant, Replica};
use proptest::prelude::*;

const PARTICIPANTS: [&str; 4] = ["admin", "alice", "bob", "carol"];

fn participants() -> Vec<Participant> {
    PARTICIPANTS
        .iter()
        .map(|seed| Participant::from_seed_string(seed))
        .collect()
}

/// Admin registration, funding and one extra writer, then the transfers
fn history(steps: &[TransferStep]) -> Vec<DeliveredOperation> {
    let people = participants();
    let admin = &people[0];
    let mut factory = OperationFactory::new(42, test_tx_validity());

    let mut ops = vec![factory.add_admin(admin)];
    for person in &people[1..] {
        ops.push(factory.balance_initialization(admin, person.address(), tokens(50)));
    }
    ops.push(factory.append_whitelist(admin, people[1].address()));
    ops.push(factory.add_writer(&people[1], admin));
    ops.push(factory.add_indexer(admin, people[1].address()));
    ops.push(factory.disable_initialization(admin));

    for step in steps {
        let validator = &people[step.sender % 2];
        ops.push(factory.transfer(
            &people[step.sender],
            people[step.recipient].address(),
            step.amount,
            validator,
        ));
    }
    ops
}

fn fresh_replica() -> Replica {
    Replica::new(participants()[0].writing_key(), test_tx_validity())
}

fn total_holdings(replica: &Replica) -> Balance {
    participants()
        .iter()
        .map(|p| replica.holdings(p.address()))
        .fold(Balance::ZERO, |sum, h| sum.add(h).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn replicas_agree_byte_for_byte(steps in arb_transfer_steps(PARTICIPANTS.len(), 12)) {
        let ops = history(&steps);

        let mut whole = fresh_replica();
        let whole_report = whole.apply(&ops);

        let mut split = fresh_replica();
        let mut split_changes = Vec::new();
        for op in &ops {
            let report = split.apply(std::slice::from_ref(op));
            split_changes.extend_from_slice(report.membership.changes());
        }

        prop_assert_eq!(whole.store(), split.store());
        prop_assert_eq!(whole_report.membership.changes(), split_changes.as_slice());
        prop_assert_eq!(whole.membership(), split.membership());
    }

    #[test]
    fn reapplying_history_changes_nothing(steps in arb_transfer_steps(PARTICIPANTS.len(), 12)) {
        let ops = history(&steps);
        let mut replica = fresh_replica();
        let first = replica.apply(&ops);
        let snapshot = replica.store().clone();
        let applied: Vec<DeliveredOperation> = ops
            .iter()
            .zip(&first.outcomes)
            .filter(|(_, outcome)| outcome.is_applied())
            .map(|(op, _)| op.clone())
            .collect();

        let report = replica.apply(&applied);
        prop_assert_eq!(report.applied(), 0);
        prop_assert!(report
            .outcomes
            .iter()
            .all(|outcome| matches!(outcome.result, Err(msb_apply::ApplyError::Replay(_)))));
        prop_assert!(report.membership.is_empty());
        prop_assert_eq!(replica.store(), &snapshot);
    }

    #[test]
    fn transfers_only_burn_the_unrewarded_fee(steps in arb_transfer_steps(PARTICIPANTS.len(), 12)) {
        let ops = history(&steps);
        let setup = ops.len() - steps.len();
        let mut replica = fresh_replica();
        replica.apply(&ops[..setup]);

        for (step, op) in steps.iter().zip(&ops[setup..]) {
            let people = participants();
            let sender = people[step.sender].address();
            let recipient = people[step.recipient].address();
            let before_total = total_holdings(&replica);
            let before_sender = replica.balance(sender);
            let before_recipient = replica.balance(recipient);

            let report = replica.apply(std::slice::from_ref(op));
            let after_total = total_holdings(&replica);

            if report.applied() == 1 {
                // Even senders are validated by the admin, odd ones by alice.
                let validator = step.sender % 2;
                let burned = if validator == step.sender { amount("0.03") } else { amount("0.0075") };
                prop_assert_eq!(after_total, before_total.sub(burned).unwrap());
                if step.recipient != step.sender && step.recipient != validator {
                    prop_assert_eq!(
                        replica.balance(recipient),
                        before_recipient.add(step.amount).unwrap()
                    );
                }
            } else {
                let required = step.amount.add(amount("0.03")).unwrap();
                prop_assert!(before_sender < required);
                prop_assert_eq!(after_total, before_total);
            }
        }
    }
}
