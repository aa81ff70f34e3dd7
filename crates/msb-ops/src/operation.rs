//! Validated, strongly typed operations

use msb_core::{Address, Balance, Hash32, Nonce, SignatureBytes, WriterKey};

use crate::kind::{OperationKind, PayloadFamily};
use crate::message;

/// Kind-specific content of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    /// Add admin / disable initialization
    CoreAdmin {
        /// Writing key of the requester
        writing_key: WriterKey,
    },
    /// Whitelist, ban, add or remove indexer
    AdminControl {
        /// Address acted upon
        target: Address,
    },
    /// Add or remove writer, admin recovery
    RoleAccess {
        /// Writing key being registered, released or rotated to
        writing_key: WriterKey,
    },
    /// Balance initialization
    BalanceInitialization {
        /// Credited address
        target: Address,
        /// Credited amount
        amount: Balance,
    },
    /// Transfer
    Transfer {
        /// Credited address
        recipient: Address,
        /// Transferred amount
        amount: Balance,
    },
    /// Subnetwork transaction
    Transaction {
        /// Subnetwork writer key of the requester
        writing_key: WriterKey,
        /// Hash of the settled content
        content_hash: Hash32,
        /// Bootstrap key of the subnetwork
        external_bootstrap: WriterKey,
        /// Bootstrap key of this ledger
        msb_bootstrap: WriterKey,
    },
    /// Bootstrap deployment
    BootstrapDeployment {
        /// External bootstrap key being registered
        bootstrap: WriterKey,
        /// Channel of the external network
        channel: Hash32,
    },
}

impl OperationBody {
    /// Payload family of this body
    pub fn family(&self) -> PayloadFamily {
        match self {
            OperationBody::CoreAdmin { .. } => PayloadFamily::CoreAdmin,
            OperationBody::AdminControl { .. } => PayloadFamily::AdminControl,
            OperationBody::RoleAccess { .. } => PayloadFamily::RoleAccess,
            OperationBody::BalanceInitialization { .. } => PayloadFamily::BalanceInitialization,
            OperationBody::Transfer { .. } => PayloadFamily::Transfer,
            OperationBody::Transaction { .. } => PayloadFamily::Transaction,
            OperationBody::BootstrapDeployment { .. } => PayloadFamily::BootstrapDeployment,
        }
    }

    /// Body fields in canonical message order
    pub fn message_parts(&self) -> Vec<Vec<u8>> {
        match self {
            OperationBody::CoreAdmin { writing_key } | OperationBody::RoleAccess { writing_key } => {
                vec![writing_key.as_bytes().to_vec()]
            }
            OperationBody::AdminControl { target } => vec![target.as_bytes().to_vec()],
            OperationBody::BalanceInitialization { target, amount } => {
                vec![target.as_bytes().to_vec(), amount.to_bytes().to_vec()]
            }
            OperationBody::Transfer { recipient, amount } => {
                vec![recipient.as_bytes().to_vec(), amount.to_bytes().to_vec()]
            }
            OperationBody::Transaction {
                writing_key,
                content_hash,
                external_bootstrap,
                msb_bootstrap,
            } => vec![
                writing_key.as_bytes().to_vec(),
                content_hash.as_bytes().to_vec(),
                external_bootstrap.as_bytes().to_vec(),
                msb_bootstrap.as_bytes().to_vec(),
            ],
            OperationBody::BootstrapDeployment { bootstrap, channel } => {
                vec![bootstrap.as_bytes().to_vec(), channel.as_bytes().to_vec()]
            }
        }
    }
}

/// Validator cosignature of a complete operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cosignature {
    /// Validator address
    pub validator: Address,
    /// Validator nonce
    pub nonce: Nonce,
    /// Validator signature over [`message::validator_hash`]
    pub signature: SignatureBytes,
}

/// An operation that passed schema validation.
///
/// Passing the schema says nothing about authenticity; the engine still
/// recomputes `tx` and checks both signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Type discriminant
    pub kind: OperationKind,
    /// Requester address
    pub requester: Address,
    /// Claimed operation hash, the replay key
    pub tx: Hash32,
    /// Expected membership-sequence digest
    pub tx_validity: Hash32,
    /// Requester nonce
    pub nonce: Nonce,
    /// Requester signature over `tx`
    pub signature: SignatureBytes,
    /// Kind-specific content
    pub body: OperationBody,
    /// Present once a validator completed the operation
    pub cosign: Option<Cosignature>,
}

impl Operation {
    /// Recompute the canonical requester hash from the operation's fields
    pub fn compute_hash(&self) -> Hash32 {
        message::requester_hash(
            self.kind,
            &self.requester,
            &self.tx_validity,
            &self.body,
            &self.nonce,
        )
    }

    /// True when the validator triple is present
    pub fn is_complete(&self) -> bool {
        self.cosign.is_some()
    }
}
