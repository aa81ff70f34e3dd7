//! Operation factories
//!
//! Build operations the way requesters and validators do: sign with the
//! requester wallet, cosign with the validator wallet, encode to wire bytes
//! and tag with the writer log they are delivered on.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use msb_apply::DeliveredOperation;
use msb_core::{Address, Balance, Hash32, Nonce, WriterKey};
use msb_ops::assembly::encode;
use msb_ops::{cosign, Operation, OperationBody, OperationBuilder, OperationKind};

use crate::keys::Participant;

/// Seeded nonce generator
#[derive(Debug, Clone)]
pub struct NonceSource {
    rng: ChaCha20Rng,
}

impl NonceSource {
    /// Generator seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Next nonce
    pub fn next_nonce(&mut self) -> Nonce {
        let mut bytes = [0u8; 32];
        self.rng.fill_bytes(&mut bytes);
        Nonce::new(bytes)
    }
}

/// Wire bytes of `op` delivered on the log of `from`
pub fn deliver(op: &Operation, from: WriterKey) -> DeliveredOperation {
    DeliveredOperation::new(from, encode(op).expect("operation encodes"))
}

/// Builds delivered operations against a fixed membership digest
#[derive(Debug, Clone)]
pub struct OperationFactory {
    nonces: NonceSource,
    tx_validity: Hash32,
}

impl OperationFactory {
    /// Factory with nonces seeded by `seed`
    pub fn new(seed: u64, tx_validity: Hash32) -> Self {
        Self {
            nonces: NonceSource::new(seed),
            tx_validity,
        }
    }

    /// Partial operation signed by `requester`
    pub fn signed(&mut self, kind: OperationKind, body: OperationBody, requester: &Participant) -> Operation {
        OperationBuilder::new(kind, body)
            .expect("body matches kind")
            .tx_validity(self.tx_validity)
            .nonce(self.nonces.next_nonce())
            .sign(requester.signing_key())
    }

    /// Operation signed by `requester` and cosigned by `validator`
    pub fn cosigned(
        &mut self,
        kind: OperationKind,
        body: OperationBody,
        requester: &Participant,
        validator: &Participant,
    ) -> Operation {
        let partial = self.signed(kind, body, requester);
        cosign(&partial, validator.signing_key(), self.nonces.next_nonce()).expect("kind is cosignable")
    }

    /// Admin-only operation appended on the admin's log
    fn admin_op(&mut self, kind: OperationKind, body: OperationBody, admin: &Participant) -> DeliveredOperation {
        let op = self.signed(kind, body, admin);
        deliver(&op, admin.writing_key())
    }

    /// Cosigned operation appended on the validator's log
    fn validated_op(
        &mut self,
        kind: OperationKind,
        body: OperationBody,
        requester: &Participant,
        validator: &Participant,
    ) -> DeliveredOperation {
        let op = self.cosigned(kind, body, requester, validator);
        deliver(&op, validator.writing_key())
    }

    /// Register `admin`; its writing key must be the ledger bootstrap
    pub fn add_admin(&mut self, admin: &Participant) -> DeliveredOperation {
        let body = OperationBody::CoreAdmin {
            writing_key: admin.writing_key(),
        };
        self.admin_op(OperationKind::AddAdmin, body, admin)
    }

    /// Close the initialization phase
    pub fn disable_initialization(&mut self, admin: &Participant) -> DeliveredOperation {
        let body = OperationBody::CoreAdmin {
            writing_key: admin.writing_key(),
        };
        self.admin_op(OperationKind::DisableInitialization, body, admin)
    }

    /// Credit `amount` to `target`
    pub fn balance_initialization(
        &mut self,
        admin: &Participant,
        target: &Address,
        amount: Balance,
    ) -> DeliveredOperation {
        let body = OperationBody::BalanceInitialization {
            target: target.clone(),
            amount,
        };
        self.admin_op(OperationKind::BalanceInitialization, body, admin)
    }

    /// Whitelist `target`
    pub fn append_whitelist(&mut self, admin: &Participant, target: &Address) -> DeliveredOperation {
        let body = OperationBody::AdminControl {
            target: target.clone(),
        };
        self.admin_op(OperationKind::AppendWhitelist, body, admin)
    }

    /// Ban `target`
    pub fn ban_validator(&mut self, admin: &Participant, target: &Address) -> DeliveredOperation {
        let body = OperationBody::AdminControl {
            target: target.clone(),
        };
        self.admin_op(OperationKind::BanValidator, body, admin)
    }

    /// Promote `target` to indexer
    pub fn add_indexer(&mut self, admin: &Participant, target: &Address) -> DeliveredOperation {
        let body = OperationBody::AdminControl {
            target: target.clone(),
        };
        self.admin_op(OperationKind::AddIndexer, body, admin)
    }

    /// Demote `target` from indexer
    pub fn remove_indexer(&mut self, admin: &Participant, target: &Address) -> DeliveredOperation {
        let body = OperationBody::AdminControl {
            target: target.clone(),
        };
        self.admin_op(OperationKind::RemoveIndexer, body, admin)
    }

    /// `requester` becomes a writer under its writing key
    pub fn add_writer(&mut self, requester: &Participant, validator: &Participant) -> DeliveredOperation {
        let body = OperationBody::RoleAccess {
            writing_key: requester.writing_key(),
        };
        self.validated_op(OperationKind::AddWriter, body, requester, validator)
    }

    /// `requester` stops being a writer
    pub fn remove_writer(&mut self, requester: &Participant, validator: &Participant) -> DeliveredOperation {
        let body = OperationBody::RoleAccess {
            writing_key: requester.writing_key(),
        };
        self.validated_op(OperationKind::RemoveWriter, body, requester, validator)
    }

    /// Rotate the admin onto `new_key`
    pub fn admin_recovery(
        &mut self,
        admin: &Participant,
        new_key: WriterKey,
        validator: &Participant,
    ) -> DeliveredOperation {
        let body = OperationBody::RoleAccess { writing_key: new_key };
        self.validated_op(OperationKind::AdminRecovery, body, admin, validator)
    }

    /// Move `amount` from `sender` to `recipient`
    pub fn transfer(
        &mut self,
        sender: &Participant,
        recipient: &Address,
        amount: Balance,
        validator: &Participant,
    ) -> DeliveredOperation {
        let body = OperationBody::Transfer {
            recipient: recipient.clone(),
            amount,
        };
        self.validated_op(OperationKind::Transfer, body, sender, validator)
    }

    /// Register external bootstrap `bootstrap`
    pub fn bootstrap_deployment(
        &mut self,
        requester: &Participant,
        bootstrap: WriterKey,
        validator: &Participant,
    ) -> DeliveredOperation {
        let body = OperationBody::BootstrapDeployment {
            bootstrap,
            channel: msb_core::crypto::hash(bootstrap.as_bytes()),
        };
        self.validated_op(OperationKind::BootstrapDeployment, body, requester, validator)
    }

    /// Settle subnetwork content against external bootstrap `bootstrap`
    pub fn transaction(
        &mut self,
        requester: &Participant,
        bootstrap: WriterKey,
        msb_bootstrap: WriterKey,
        content: &[u8],
        validator: &Participant,
    ) -> DeliveredOperation {
        let body = OperationBody::Transaction {
            writing_key: requester.writing_key(),
            content_hash: msb_core::crypto::hash(content),
            external_bootstrap: bootstrap,
            msb_bootstrap,
        };
        self.validated_op(OperationKind::Transaction, body, requester, validator)
    }
}
