//! Client-side operation assembly
//!
//! Builds and signs operations in the format the engine consumes. This runs
//! on requesters and validators, never inside the apply path. A requester
//! produces a *partial* operation; a validator completes it with
//! [`cosign`] before appending it to the log.

use ed25519_dalek::{Signer, SigningKey};
use thiserror::Error;

use msb_core::{Address, Hash32, Nonce, SignatureBytes};

use crate::kind::{Field, OperationKind, PayloadFamily};
use crate::message;
use crate::operation::{Cosignature, Operation, OperationBody};
use crate::wire::{RawOperation, RawPayload};

/// Invalid builder input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// Body does not belong to the kind's payload family
    #[error("{kind} expects a {expected} body")]
    BodyMismatch {
        /// Requested kind
        kind: OperationKind,
        /// Family the kind requires
        expected: PayloadFamily,
    },

    /// Kind never carries a validator cosignature
    #[error("{0} cannot be cosigned")]
    NotCosignable(OperationKind),
}

/// Builder for a requester-signed operation
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    kind: OperationKind,
    body: OperationBody,
    tx_validity: Hash32,
    nonce: Nonce,
}

impl OperationBuilder {
    /// Start an operation of `kind` carrying `body`
    pub fn new(kind: OperationKind, body: OperationBody) -> Result<Self, AssemblyError> {
        if kind.family() != body.family() {
            return Err(AssemblyError::BodyMismatch {
                kind,
                expected: kind.family(),
            });
        }
        Ok(Self {
            kind,
            body,
            tx_validity: Hash32::ZERO,
            nonce: Nonce::new([0u8; 32]),
        })
    }

    /// Membership-sequence digest the operation is valid against
    pub fn tx_validity(mut self, tx_validity: Hash32) -> Self {
        self.tx_validity = tx_validity;
        self
    }

    /// Requester nonce; callers should draw it from a CSPRNG
    pub fn nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = nonce;
        self
    }

    /// Hash and sign as `signer`, producing a partial operation
    pub fn sign(self, signer: &SigningKey) -> Operation {
        let requester = Address::from_public_key(&signer.verifying_key());
        let tx = message::requester_hash(
            self.kind,
            &requester,
            &self.tx_validity,
            &self.body,
            &self.nonce,
        );
        let signature = SignatureBytes::new(signer.sign(tx.as_bytes()).to_bytes());
        Operation {
            kind: self.kind,
            requester,
            tx,
            tx_validity: self.tx_validity,
            nonce: self.nonce,
            signature,
            body: self.body,
            cosign: None,
        }
    }
}

/// Complete a partial operation with a validator cosignature
pub fn cosign(
    operation: &Operation,
    validator: &SigningKey,
    nonce: Nonce,
) -> Result<Operation, AssemblyError> {
    if !operation.kind.requires_cosign() {
        return Err(AssemblyError::NotCosignable(operation.kind));
    }
    let address = Address::from_public_key(&validator.verifying_key());
    let digest = message::validator_hash(&operation.tx, &address, &nonce);
    let signature = SignatureBytes::new(validator.sign(digest.as_bytes()).to_bytes());

    let mut completed = operation.clone();
    completed.cosign = Some(Cosignature {
        validator: address,
        nonce,
        signature,
    });
    Ok(completed)
}

/// Lower a typed operation to its wire form
pub fn to_raw(operation: &Operation) -> RawOperation {
    let mut payload = RawPayload::empty(operation.kind.family());
    let fields = payload.fields_mut();
    fields.set(Field::Tx, operation.tx.as_bytes().to_vec());
    fields.set(Field::TxValidity, operation.tx_validity.as_bytes().to_vec());
    fields.set(Field::Nonce, operation.nonce.as_bytes().to_vec());
    fields.set(Field::Signature, operation.signature.as_bytes().to_vec());

    match &operation.body {
        OperationBody::CoreAdmin { writing_key } | OperationBody::RoleAccess { writing_key } => {
            fields.set(Field::WritingKey, writing_key.as_bytes().to_vec());
        }
        OperationBody::AdminControl { target } => {
            fields.set(Field::Target, target.as_bytes().to_vec());
        }
        OperationBody::BalanceInitialization { target, amount } => {
            fields.set(Field::Target, target.as_bytes().to_vec());
            fields.set(Field::Amount, amount.to_bytes().to_vec());
        }
        OperationBody::Transfer { recipient, amount } => {
            fields.set(Field::Recipient, recipient.as_bytes().to_vec());
            fields.set(Field::Amount, amount.to_bytes().to_vec());
        }
        OperationBody::Transaction {
            writing_key,
            content_hash,
            external_bootstrap,
            msb_bootstrap,
        } => {
            fields.set(Field::WritingKey, writing_key.as_bytes().to_vec());
            fields.set(Field::ContentHash, content_hash.as_bytes().to_vec());
            fields.set(Field::ExternalBootstrap, external_bootstrap.as_bytes().to_vec());
            fields.set(Field::MsbBootstrap, msb_bootstrap.as_bytes().to_vec());
        }
        OperationBody::BootstrapDeployment { bootstrap, channel } => {
            fields.set(Field::ExternalBootstrap, bootstrap.as_bytes().to_vec());
            fields.set(Field::Channel, channel.as_bytes().to_vec());
        }
    }

    if let Some(cosign) = &operation.cosign {
        fields.set(Field::ValidatorAddress, cosign.validator.as_bytes().to_vec());
        fields.set(Field::ValidatorNonce, cosign.nonce.as_bytes().to_vec());
        fields.set(Field::ValidatorSignature, cosign.signature.as_bytes().to_vec());
    }

    RawOperation {
        kind: operation.kind.as_u32(),
        address: Some(operation.requester.as_bytes().to_vec()),
        payload,
    }
}

/// Wire bytes of a typed operation
pub fn encode(operation: &Operation) -> bincode::Result<Vec<u8>> {
    to_raw(operation).encode()
}
