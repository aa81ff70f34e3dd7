//! Apply error taxonomy
//!
//! Every failure is local to one operation. The engine logs it, records it in
//! the report and moves on to the next operation; nothing here aborts a batch.

use thiserror::Error;

use msb_core::{ErrorCode, Hash32};
use msb_ops::{DecodeError, SchemaError};

use crate::view::ViewError;

/// Why a structurally valid operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Requester address does not hold a valid ed25519 key
    #[error("requester address is not a valid public key")]
    InvalidRequesterKey,
    /// Claimed `tx` differs from the recomputed requester hash
    #[error("operation hash does not match its contents")]
    HashMismatch,
    /// Requester signature does not verify
    #[error("requester signature is invalid")]
    InvalidSignature,
    /// `txv` is not the current membership-sequence digest
    #[error("operation was built against a stale membership sequence")]
    StaleTxValidity,
    /// Body does not belong to the kind
    #[error("operation body does not match its kind")]
    BodyMismatch,

    /// Kind needs a validator cosignature but carries none
    #[error("operation is missing its validator cosignature")]
    MissingCosignature,
    /// Validator address does not hold a valid ed25519 key
    #[error("validator address is not a valid public key")]
    InvalidValidatorKey,
    /// Validator signature does not verify
    #[error("validator signature is invalid")]
    InvalidValidatorSignature,
    /// Validator is not a writer
    #[error("validator is not a writer")]
    ValidatorNotWriter,
    /// Validator's writing key is not the log the operation arrived on
    #[error("validator does not own the appending writer key")]
    ValidatorKeyMismatch,
    /// Requester cosigned an operation that needs an independent validator
    #[error("validator must differ from the requester")]
    ValidatorIsRequester,

    /// Admin already registered
    #[error("admin already exists")]
    AdminExists,
    /// No admin registered yet
    #[error("admin does not exist")]
    NoAdmin,
    /// Requester or appending writer is not the admin
    #[error("only the admin may request this operation")]
    NotAdmin,
    /// Add-admin not appended by the ledger's bootstrap writer
    #[error("operation must come from the bootstrap writer")]
    NotBootstrapWriter,
    /// Initialization phase already closed
    #[error("initialization is disabled")]
    InitializationDisabled,

    /// Writing key in the body differs from the one on record
    #[error("writing key does not match the registered key")]
    WritingKeyMismatch,
    /// Writing key is bound to another address
    #[error("writing key belongs to another participant")]
    WriterKeyInUse,

    /// Target is already whitelisted
    #[error("participant is already whitelisted")]
    AlreadyWhitelisted,
    /// Participant is not whitelisted
    #[error("participant is not whitelisted")]
    NotWhitelisted,
    /// Participant is already a writer
    #[error("participant is already a writer")]
    AlreadyWriter,
    /// Participant is not a writer
    #[error("participant is not a writer")]
    NotWriter,
    /// Participant is already an indexer
    #[error("participant is already an indexer")]
    AlreadyIndexer,
    /// Participant is not an indexer
    #[error("participant is not an indexer")]
    NotIndexer,
    /// Operation would touch an indexer it must leave alone
    #[error("target is an indexer")]
    TargetIsIndexer,
    /// Operation would strip the admin's roles
    #[error("target is the admin")]
    TargetIsAdmin,

    /// Writing key is already a membership entry
    #[error("writing key is already in the membership set")]
    MembershipConflict,
    /// Removal would leave the membership set empty
    #[error("cannot remove the last indexer")]
    LastIndexer,
    /// Admin's current key is not in the membership set
    #[error("admin writing key is not an indexer")]
    AdminKeyNotMember,

    /// Balance cannot cover amount, stake or fee
    #[error("insufficient balance")]
    InsufficientBalance,
    /// Balance arithmetic left the representable range
    #[error("balance arithmetic overflow")]
    ArithmeticOverflow,
    /// License counter exhausted
    #[error("license ids exhausted")]
    LicensesExhausted,
    /// Writer registry counter exhausted
    #[error("writer registry exhausted")]
    WriterRegistryExhausted,

    /// Transaction names a different ledger bootstrap
    #[error("operation targets a different ledger")]
    BootstrapMismatch,
    /// Deployment would register the ledger's own bootstrap
    #[error("cannot deploy the ledger's own bootstrap")]
    ReservedBootstrap,
    /// Bootstrap already deployed
    #[error("bootstrap already deployed")]
    DeploymentExists,
    /// Transaction targets a bootstrap never deployed
    #[error("bootstrap is not deployed")]
    UnknownDeployment,
}

impl ErrorCode for Rejection {
    fn code(&self) -> &'static str {
        match self {
            Rejection::InvalidRequesterKey => "invalid_requester_key",
            Rejection::HashMismatch => "hash_mismatch",
            Rejection::InvalidSignature => "invalid_signature",
            Rejection::StaleTxValidity => "stale_tx_validity",
            Rejection::BodyMismatch => "body_mismatch",
            Rejection::MissingCosignature => "missing_cosignature",
            Rejection::InvalidValidatorKey => "invalid_validator_key",
            Rejection::InvalidValidatorSignature => "invalid_validator_signature",
            Rejection::ValidatorNotWriter => "validator_not_writer",
            Rejection::ValidatorKeyMismatch => "validator_key_mismatch",
            Rejection::ValidatorIsRequester => "validator_is_requester",
            Rejection::AdminExists => "admin_exists",
            Rejection::NoAdmin => "no_admin",
            Rejection::NotAdmin => "not_admin",
            Rejection::NotBootstrapWriter => "not_bootstrap_writer",
            Rejection::InitializationDisabled => "initialization_disabled",
            Rejection::WritingKeyMismatch => "writing_key_mismatch",
            Rejection::WriterKeyInUse => "writer_key_in_use",
            Rejection::AlreadyWhitelisted => "already_whitelisted",
            Rejection::NotWhitelisted => "not_whitelisted",
            Rejection::AlreadyWriter => "already_writer",
            Rejection::NotWriter => "not_writer",
            Rejection::AlreadyIndexer => "already_indexer",
            Rejection::NotIndexer => "not_indexer",
            Rejection::TargetIsIndexer => "target_is_indexer",
            Rejection::TargetIsAdmin => "target_is_admin",
            Rejection::MembershipConflict => "membership_conflict",
            Rejection::LastIndexer => "last_indexer",
            Rejection::AdminKeyNotMember => "admin_key_not_member",
            Rejection::InsufficientBalance => "insufficient_balance",
            Rejection::ArithmeticOverflow => "arithmetic_overflow",
            Rejection::LicensesExhausted => "licenses_exhausted",
            Rejection::WriterRegistryExhausted => "writer_registry_exhausted",
            Rejection::BootstrapMismatch => "bootstrap_mismatch",
            Rejection::ReservedBootstrap => "reserved_bootstrap",
            Rejection::DeploymentExists => "deployment_exists",
            Rejection::UnknownDeployment => "unknown_deployment",
        }
    }
}

/// Why an operation was skipped
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Bytes are not a wire operation
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Operation fails structural validation
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Authentication, authority or state precondition failed
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),
    /// Operation hash was already applied
    #[error("operation {0} already applied")]
    Replay(Hash32),
    /// Reading the view failed
    #[error(transparent)]
    View(#[from] ViewError),
}

impl ApplyError {
    /// Rejection reason, when the operation was refused on its merits
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            ApplyError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl ErrorCode for ApplyError {
    fn code(&self) -> &'static str {
        match self {
            ApplyError::Decode(e) => e.code(),
            ApplyError::Schema(e) => e.code(),
            ApplyError::Rejected(reason) => reason.code(),
            ApplyError::Replay(_) => "replay",
            ApplyError::View(e) => e.code(),
        }
    }
}

impl From<msb_core::CodecError> for ApplyError {
    fn from(error: msb_core::CodecError) -> Self {
        ApplyError::View(ViewError::Codec(error))
    }
}

impl From<crate::view::StoreError> for ApplyError {
    fn from(error: crate::view::StoreError) -> Self {
        ApplyError::View(ViewError::Store(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_pass_through_wrappers() {
        let error = ApplyError::from(Rejection::InsufficientBalance);
        assert_eq!(error.code(), "insufficient_balance");
        assert_eq!(error.rejection(), Some(Rejection::InsufficientBalance));

        let replay = ApplyError::Replay(Hash32::ZERO);
        assert_eq!(replay.code(), "replay");
        assert_eq!(replay.rejection(), None);
    }
}
