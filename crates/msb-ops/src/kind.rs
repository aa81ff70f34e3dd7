//! Operation kinds, payload families and payload fields

use std::fmt;

use msb_core::{ADDRESS_BYTE_LENGTH, BALANCE_BYTE_LENGTH, KEY_BYTE_LENGTH, SIGNATURE_BYTE_LENGTH};
use serde::{Deserialize, Serialize};

/// Type discriminant carried by every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum OperationKind {
    /// Register the bootstrap writer as admin
    AddAdmin = 1,
    /// Permanently disable balance initialization
    DisableInitialization = 2,
    /// Credit an address during initialization
    BalanceInitialization = 3,
    /// Whitelist an address
    AppendWhitelist = 4,
    /// Promote the requester to writer
    AddWriter = 5,
    /// Demote the requester from writer
    RemoveWriter = 6,
    /// Promote a writer to indexer
    AddIndexer = 7,
    /// Demote an indexer
    RemoveIndexer = 8,
    /// Clear every role of an address
    BanValidator = 9,
    /// Rotate the admin writing key
    AdminRecovery = 10,
    /// Register an external bootstrap key
    BootstrapDeployment = 11,
    /// Settle a subnetwork transaction
    Transaction = 12,
    /// Move value between addresses
    Transfer = 13,
}

impl OperationKind {
    /// Every kind, in discriminant order
    pub const ALL: [OperationKind; 13] = [
        OperationKind::AddAdmin,
        OperationKind::DisableInitialization,
        OperationKind::BalanceInitialization,
        OperationKind::AppendWhitelist,
        OperationKind::AddWriter,
        OperationKind::RemoveWriter,
        OperationKind::AddIndexer,
        OperationKind::RemoveIndexer,
        OperationKind::BanValidator,
        OperationKind::AdminRecovery,
        OperationKind::BootstrapDeployment,
        OperationKind::Transaction,
        OperationKind::Transfer,
    ];

    /// Look up a wire discriminant
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_u32() == value)
    }

    /// Wire discriminant
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Payload family this kind must carry
    pub fn family(self) -> PayloadFamily {
        match self {
            OperationKind::AddAdmin | OperationKind::DisableInitialization => {
                PayloadFamily::CoreAdmin
            }
            OperationKind::AppendWhitelist
            | OperationKind::AddIndexer
            | OperationKind::RemoveIndexer
            | OperationKind::BanValidator => PayloadFamily::AdminControl,
            OperationKind::AddWriter
            | OperationKind::RemoveWriter
            | OperationKind::AdminRecovery => PayloadFamily::RoleAccess,
            OperationKind::BalanceInitialization => PayloadFamily::BalanceInitialization,
            OperationKind::Transfer => PayloadFamily::Transfer,
            OperationKind::Transaction => PayloadFamily::Transaction,
            OperationKind::BootstrapDeployment => PayloadFamily::BootstrapDeployment,
        }
    }

    /// Kinds that are only applied once a validator cosigned them
    pub fn requires_cosign(self) -> bool {
        self.family().allows_cosign()
    }

    /// Kinds only the admin may request
    pub fn is_admin_only(self) -> bool {
        matches!(
            self,
            OperationKind::DisableInitialization
                | OperationKind::BalanceInitialization
                | OperationKind::AppendWhitelist
                | OperationKind::AddIndexer
                | OperationKind::RemoveIndexer
                | OperationKind::BanValidator
        )
    }

    /// Stable snake_case name used in logs
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::AddAdmin => "add_admin",
            OperationKind::DisableInitialization => "disable_initialization",
            OperationKind::BalanceInitialization => "balance_initialization",
            OperationKind::AppendWhitelist => "append_whitelist",
            OperationKind::AddWriter => "add_writer",
            OperationKind::RemoveWriter => "remove_writer",
            OperationKind::AddIndexer => "add_indexer",
            OperationKind::RemoveIndexer => "remove_indexer",
            OperationKind::BanValidator => "ban_validator",
            OperationKind::AdminRecovery => "admin_recovery",
            OperationKind::BootstrapDeployment => "bootstrap_deployment",
            OperationKind::Transaction => "transaction",
            OperationKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload shape shared by a group of kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadFamily {
    /// Admin bootstrap and initialization control
    CoreAdmin,
    /// Admin actions targeting another address
    AdminControl,
    /// Writer promotion, demotion and admin key recovery
    RoleAccess,
    /// Initial balance allocation
    BalanceInitialization,
    /// Value transfer
    Transfer,
    /// Subnetwork transaction settlement
    Transaction,
    /// External bootstrap registration
    BootstrapDeployment,
}

const CORE_ADMIN_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::WritingKey,
    Field::Nonce,
    Field::Signature,
];
const ADMIN_CONTROL_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::Target,
    Field::Nonce,
    Field::Signature,
];
const ROLE_ACCESS_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::WritingKey,
    Field::Nonce,
    Field::Signature,
];
const BALANCE_INITIALIZATION_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::Target,
    Field::Amount,
    Field::Nonce,
    Field::Signature,
];
const TRANSFER_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::Recipient,
    Field::Amount,
    Field::Nonce,
    Field::Signature,
];
const TRANSACTION_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::WritingKey,
    Field::ContentHash,
    Field::ExternalBootstrap,
    Field::MsbBootstrap,
    Field::Nonce,
    Field::Signature,
];
const BOOTSTRAP_DEPLOYMENT_FIELDS: &[Field] = &[
    Field::Tx,
    Field::TxValidity,
    Field::ExternalBootstrap,
    Field::Channel,
    Field::Nonce,
    Field::Signature,
];

/// The optional validator cosignature triple
pub const COSIGN_FIELDS: [Field; 3] = [
    Field::ValidatorAddress,
    Field::ValidatorNonce,
    Field::ValidatorSignature,
];

impl PayloadFamily {
    /// Fields every payload of this family must carry
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            PayloadFamily::CoreAdmin => CORE_ADMIN_FIELDS,
            PayloadFamily::AdminControl => ADMIN_CONTROL_FIELDS,
            PayloadFamily::RoleAccess => ROLE_ACCESS_FIELDS,
            PayloadFamily::BalanceInitialization => BALANCE_INITIALIZATION_FIELDS,
            PayloadFamily::Transfer => TRANSFER_FIELDS,
            PayloadFamily::Transaction => TRANSACTION_FIELDS,
            PayloadFamily::BootstrapDeployment => BOOTSTRAP_DEPLOYMENT_FIELDS,
        }
    }

    /// Whether the validator triple may appear
    pub fn allows_cosign(self) -> bool {
        matches!(
            self,
            PayloadFamily::RoleAccess
                | PayloadFamily::Transfer
                | PayloadFamily::Transaction
                | PayloadFamily::BootstrapDeployment
        )
    }

    /// Whether `field` belongs to this family at all
    pub fn allows(self, field: Field) -> bool {
        self.required_fields().contains(&field)
            || (self.allows_cosign() && COSIGN_FIELDS.contains(&field))
    }

    /// Stable name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            PayloadFamily::CoreAdmin => "core_admin",
            PayloadFamily::AdminControl => "admin_control",
            PayloadFamily::RoleAccess => "role_access",
            PayloadFamily::BalanceInitialization => "balance_initialization",
            PayloadFamily::Transfer => "transfer",
            PayloadFamily::Transaction => "transaction",
            PayloadFamily::BootstrapDeployment => "bootstrap_deployment",
        }
    }
}

impl fmt::Display for PayloadFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Operation hash (`tx`)
    Tx,
    /// Expected membership-sequence digest (`txv`)
    TxValidity,
    /// Writing key (`iw`)
    WritingKey,
    /// Target address (`ia`)
    Target,
    /// Requester nonce (`in`)
    Nonce,
    /// Requester signature (`is`)
    Signature,
    /// Amount (`am`)
    Amount,
    /// Recipient address (`to`)
    Recipient,
    /// Content hash (`ch`)
    ContentHash,
    /// External bootstrap key (`bs`)
    ExternalBootstrap,
    /// Ledger bootstrap key (`mbs`)
    MsbBootstrap,
    /// Channel (`ic`)
    Channel,
    /// Validator address (`va`)
    ValidatorAddress,
    /// Validator nonce (`vn`)
    ValidatorNonce,
    /// Validator signature (`vs`)
    ValidatorSignature,
}

impl Field {
    /// Every field in canonical order
    pub const ALL: [Field; 15] = [
        Field::Tx,
        Field::TxValidity,
        Field::WritingKey,
        Field::Target,
        Field::Nonce,
        Field::Signature,
        Field::Amount,
        Field::Recipient,
        Field::ContentHash,
        Field::ExternalBootstrap,
        Field::MsbBootstrap,
        Field::Channel,
        Field::ValidatorAddress,
        Field::ValidatorNonce,
        Field::ValidatorSignature,
    ];

    /// Exact byte length of the field
    pub fn byte_length(self) -> usize {
        match self {
            Field::Target | Field::Recipient | Field::ValidatorAddress => ADDRESS_BYTE_LENGTH,
            Field::Signature | Field::ValidatorSignature => SIGNATURE_BYTE_LENGTH,
            Field::Amount => BALANCE_BYTE_LENGTH,
            _ => KEY_BYTE_LENGTH,
        }
    }

    /// Short wire name
    pub fn name(self) -> &'static str {
        match self {
            Field::Tx => "tx",
            Field::TxValidity => "txv",
            Field::WritingKey => "iw",
            Field::Target => "ia",
            Field::Nonce => "in",
            Field::Signature => "is",
            Field::Amount => "am",
            Field::Recipient => "to",
            Field::ContentHash => "ch",
            Field::ExternalBootstrap => "bs",
            Field::MsbBootstrap => "mbs",
            Field::Channel => "ic",
            Field::ValidatorAddress => "va",
            Field::ValidatorNonce => "vn",
            Field::ValidatorSignature => "vs",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_u32(kind.as_u32()), Some(kind));
        }
        assert_eq!(OperationKind::from_u32(0), None);
        assert_eq!(OperationKind::from_u32(14), None);
    }

    #[test]
    fn cosign_families() {
        assert!(OperationKind::Transfer.requires_cosign());
        assert!(OperationKind::AdminRecovery.requires_cosign());
        assert!(!OperationKind::AddIndexer.requires_cosign());
        assert!(!PayloadFamily::CoreAdmin.allows(Field::ValidatorAddress));
        assert!(PayloadFamily::Transfer.allows(Field::ValidatorNonce));
        assert!(!PayloadFamily::Transfer.allows(Field::WritingKey));
    }
}
