//! Shared ledger fixture for the integration suites

#![allow(dead_code)]

use msb_apply::{ApplyReport, DeliveredOperation, Rejection};
use msb_core::Balance;
use msb_testkit::{init_tracing, test_tx_validity, OperationFactory, Participant, Replica};

/// A replica with its admin and an operation factory
pub struct Ledger {
    pub replica: Replica,
    pub factory: OperationFactory,
    pub admin: Participant,
}

impl Ledger {
    /// Replica bootstrapped by the admin's writing key, no operation applied
    pub fn new() -> Self {
        init_tracing();
        let admin = Participant::from_seed_string("admin");
        Self {
            replica: Replica::new(admin.writing_key(), test_tx_validity()),
            factory: OperationFactory::new(7, test_tx_validity()),
            admin,
        }
    }

    /// Replica with the admin registered
    pub fn bootstrapped() -> Self {
        let mut ledger = Self::new();
        let op = ledger.factory.add_admin(&ledger.admin);
        ledger.applied(op);
        ledger
    }

    pub fn apply(&mut self, op: DeliveredOperation) -> ApplyReport {
        self.replica.apply_one(op)
    }

    /// Apply `op`, failing the test unless it was applied
    pub fn applied(&mut self, op: DeliveredOperation) -> ApplyReport {
        let report = self.apply(op);
        if let Some(Err(error)) = report.outcomes.first().map(|o| o.result.as_ref()) {
            panic!("operation was not applied: {error}");
        }
        report
    }

    /// Apply `op`, returning the reason it was rejected
    pub fn rejected(&mut self, op: DeliveredOperation) -> Rejection {
        let report = self.apply(op);
        let outcome = report.outcomes.first().expect("one outcome");
        match &outcome.result {
            Ok(()) => panic!("operation was applied"),
            Err(error) => error
                .rejection()
                .unwrap_or_else(|| panic!("not a rejection: {error}")),
        }
    }

    /// Fund, whitelist and promote `participant` to writer, validated by the admin
    pub fn onboard_writer(&mut self, participant: &Participant, funds: Balance) {
        let admin = self.admin.clone();
        let op = self
            .factory
            .balance_initialization(&admin, participant.address(), funds);
        self.applied(op);
        let op = self.factory.append_whitelist(&admin, participant.address());
        self.applied(op);
        let op = self.factory.add_writer(participant, &admin);
        self.applied(op);
    }

    pub fn disable_initialization(&mut self) {
        let admin = self.admin.clone();
        let op = self.factory.disable_initialization(&admin);
        self.applied(op);
    }
}
