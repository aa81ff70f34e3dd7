//! Operation schema validation
//!
//! [`validate`] is the only gate between untrusted decoded input and the
//! apply engine. It checks, in order:
//!
//! 1. the type discriminant is in range
//! 2. the payload variant matches the kind's family
//! 3. the requester address is present and well-formed
//! 4. no field outside the family's field set is present
//! 5. the validator triple is either complete or absent
//! 6. every required field is present
//! 7. every present field has its exact byte length
//!
//! and produces a typed [`Operation`].

use thiserror::Error;

use msb_core::{
    Address, AddressError, Balance, ErrorCode, Hash32, Nonce, SignatureBytes, WriterKey,
};

use crate::kind::{Field, OperationKind, PayloadFamily, COSIGN_FIELDS};
use crate::operation::{Cosignature, Operation, OperationBody};
use crate::wire::{PayloadFields, RawOperation};

/// Structural or semantic schema violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Discriminant outside the known kinds
    #[error("unknown operation type {0}")]
    UnknownKind(u32),

    /// Payload variant does not belong to the kind
    #[error("{kind} cannot carry a {family} payload")]
    FamilyMismatch {
        /// Declared kind
        kind: OperationKind,
        /// Carried payload family
        family: PayloadFamily,
    },

    /// No requester address
    #[error("missing requester address")]
    MissingAddress,

    /// Address field malformed
    #[error("invalid address in `{field}`: {source}")]
    InvalidAddress {
        /// Field holding the address
        field: &'static str,
        /// Underlying failure
        source: AddressError,
    },

    /// A field that the family does not define
    #[error("unexpected field `{field}` in {family} payload")]
    UnknownField {
        /// Payload family
        family: PayloadFamily,
        /// Offending field
        field: Field,
    },

    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(Field),

    /// A field has the wrong width
    #[error("field `{field}` must be {expected} bytes, got {actual}")]
    FieldLength {
        /// Offending field
        field: Field,
        /// Required width
        expected: usize,
        /// Supplied width
        actual: usize,
    },

    /// Some but not all of the validator triple is present
    #[error("validator cosignature must be complete or absent")]
    PartialCosignature,
}

impl ErrorCode for SchemaError {
    fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownKind(_) => "schema_unknown_kind",
            SchemaError::FamilyMismatch { .. } => "schema_family_mismatch",
            SchemaError::MissingAddress => "schema_missing_address",
            SchemaError::InvalidAddress { .. } => "schema_invalid_address",
            SchemaError::UnknownField { .. } => "schema_unknown_field",
            SchemaError::MissingField(_) => "schema_missing_field",
            SchemaError::FieldLength { .. } => "schema_field_length",
            SchemaError::PartialCosignature => "schema_partial_cosignature",
        }
    }
}

/// Validate a raw operation and lift it into its typed form
pub fn validate(raw: &RawOperation) -> Result<Operation, SchemaError> {
    let kind = OperationKind::from_u32(raw.kind).ok_or(SchemaError::UnknownKind(raw.kind))?;
    let family = kind.family();
    if raw.payload.family() != family {
        return Err(SchemaError::FamilyMismatch {
            kind,
            family: raw.payload.family(),
        });
    }

    let address = raw.address.as_deref().ok_or(SchemaError::MissingAddress)?;
    let requester = Address::parse(address).map_err(|source| SchemaError::InvalidAddress {
        field: "address",
        source,
    })?;

    let fields = raw.payload.fields();
    if let Some(field) = fields.present().find(|field| !family.allows(*field)) {
        return Err(SchemaError::UnknownField { family, field });
    }

    let cosign_present = COSIGN_FIELDS
        .iter()
        .filter(|field| fields.get(**field).is_some())
        .count();
    if cosign_present != 0 && cosign_present != COSIGN_FIELDS.len() {
        return Err(SchemaError::PartialCosignature);
    }

    if let Some(field) = family
        .required_fields()
        .iter()
        .find(|field| fields.get(**field).is_none())
    {
        return Err(SchemaError::MissingField(*field));
    }

    for field in fields.present() {
        let actual = fields.get(field).map_or(0, <[u8]>::len);
        if actual != field.byte_length() {
            return Err(SchemaError::FieldLength {
                field,
                expected: field.byte_length(),
                actual,
            });
        }
    }

    let reader = FieldReader(fields);
    let body = match family {
        PayloadFamily::CoreAdmin => OperationBody::CoreAdmin {
            writing_key: reader.key(Field::WritingKey)?,
        },
        PayloadFamily::AdminControl => OperationBody::AdminControl {
            target: reader.address(Field::Target)?,
        },
        PayloadFamily::RoleAccess => OperationBody::RoleAccess {
            writing_key: reader.key(Field::WritingKey)?,
        },
        PayloadFamily::BalanceInitialization => OperationBody::BalanceInitialization {
            target: reader.address(Field::Target)?,
            amount: reader.amount(Field::Amount)?,
        },
        PayloadFamily::Transfer => OperationBody::Transfer {
            recipient: reader.address(Field::Recipient)?,
            amount: reader.amount(Field::Amount)?,
        },
        PayloadFamily::Transaction => OperationBody::Transaction {
            writing_key: reader.key(Field::WritingKey)?,
            content_hash: reader.hash(Field::ContentHash)?,
            external_bootstrap: reader.key(Field::ExternalBootstrap)?,
            msb_bootstrap: reader.key(Field::MsbBootstrap)?,
        },
        PayloadFamily::BootstrapDeployment => OperationBody::BootstrapDeployment {
            bootstrap: reader.key(Field::ExternalBootstrap)?,
            channel: reader.hash(Field::Channel)?,
        },
    };

    let cosign = if cosign_present == 0 {
        None
    } else {
        Some(Cosignature {
            validator: reader.address(Field::ValidatorAddress)?,
            nonce: reader.nonce(Field::ValidatorNonce)?,
            signature: reader.signature(Field::ValidatorSignature)?,
        })
    };

    Ok(Operation {
        kind,
        requester,
        tx: reader.hash(Field::Tx)?,
        tx_validity: reader.hash(Field::TxValidity)?,
        nonce: reader.nonce(Field::Nonce)?,
        signature: reader.signature(Field::Signature)?,
        body,
        cosign,
    })
}

/// Boolean form of [`validate`]
pub fn is_valid(raw: &RawOperation) -> bool {
    validate(raw).is_ok()
}

/// Typed access to fields whose presence and width were already checked
struct FieldReader<'a>(&'a PayloadFields);

impl FieldReader<'_> {
    fn bytes(&self, field: Field) -> Result<&[u8], SchemaError> {
        self.0.get(field).ok_or(SchemaError::MissingField(field))
    }

    fn length_error(&self, field: Field) -> SchemaError {
        SchemaError::FieldLength {
            field,
            expected: field.byte_length(),
            actual: self.0.get(field).map_or(0, <[u8]>::len),
        }
    }

    fn key(&self, field: Field) -> Result<WriterKey, SchemaError> {
        WriterKey::from_slice(self.bytes(field)?).ok_or_else(|| self.length_error(field))
    }

    fn hash(&self, field: Field) -> Result<Hash32, SchemaError> {
        Hash32::from_slice(self.bytes(field)?).ok_or_else(|| self.length_error(field))
    }

    fn nonce(&self, field: Field) -> Result<Nonce, SchemaError> {
        Nonce::from_slice(self.bytes(field)?).ok_or_else(|| self.length_error(field))
    }

    fn signature(&self, field: Field) -> Result<SignatureBytes, SchemaError> {
        SignatureBytes::from_slice(self.bytes(field)?).ok_or_else(|| self.length_error(field))
    }

    fn amount(&self, field: Field) -> Result<Balance, SchemaError> {
        Balance::from_bytes(self.bytes(field)?).ok_or_else(|| self.length_error(field))
    }

    fn address(&self, field: Field) -> Result<Address, SchemaError> {
        Address::parse(self.bytes(field)?).map_err(|source| SchemaError::InvalidAddress {
            field: field.name(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::RawPayload;
    use assert_matches::assert_matches;

    fn address(seed: u8) -> Vec<u8> {
        Address::from_key_bytes(&[seed; 32]).as_bytes().to_vec()
    }

    fn transfer(with_cosign: bool) -> RawOperation {
        let mut payload = RawPayload::empty(PayloadFamily::Transfer);
        let fields = payload.fields_mut();
        fields.set(Field::Tx, vec![1u8; 32]);
        fields.set(Field::TxValidity, vec![2u8; 32]);
        fields.set(Field::Recipient, address(3));
        fields.set(Field::Amount, vec![0u8; 16]);
        fields.set(Field::Nonce, vec![4u8; 32]);
        fields.set(Field::Signature, vec![5u8; 64]);
        if with_cosign {
            fields.set(Field::ValidatorAddress, address(6));
            fields.set(Field::ValidatorNonce, vec![7u8; 32]);
            fields.set(Field::ValidatorSignature, vec![8u8; 64]);
        }
        RawOperation {
            kind: OperationKind::Transfer.as_u32(),
            address: Some(address(9)),
            payload,
        }
    }

    #[test]
    fn accepts_partial_and_complete_phases() {
        let partial = validate(&transfer(false)).unwrap();
        assert!(!partial.is_complete());
        assert_eq!(partial.kind, OperationKind::Transfer);

        let complete = validate(&transfer(true)).unwrap();
        let cosign = complete.cosign.unwrap();
        assert_eq!(cosign.validator.as_bytes(), address(6).as_slice());
        assert_eq!(cosign.nonce, Nonce::new([7u8; 32]));
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut raw = transfer(false);
        raw.kind = 0;
        assert_matches!(validate(&raw), Err(SchemaError::UnknownKind(0)));
        raw.kind = 99;
        assert!(!is_valid(&raw));
    }

    #[test]
    fn rejects_family_mismatch() {
        let mut raw = transfer(false);
        raw.kind = OperationKind::AddWriter.as_u32();
        assert_matches!(validate(&raw), Err(SchemaError::FamilyMismatch { .. }));
    }

    #[test]
    fn rejects_missing_or_bad_address() {
        let mut raw = transfer(false);
        raw.address = None;
        assert_matches!(validate(&raw), Err(SchemaError::MissingAddress));

        raw.address = Some(b"trac1zz".to_vec());
        assert_matches!(validate(&raw), Err(SchemaError::InvalidAddress { .. }));
    }

    #[test]
    fn rejects_unknown_field() {
        let mut raw = transfer(false);
        raw.payload.fields_mut().set(Field::WritingKey, vec![0u8; 32]);
        assert_matches!(
            validate(&raw),
            Err(SchemaError::UnknownField {
                field: Field::WritingKey,
                ..
            })
        );
    }

    #[test]
    fn rejects_missing_field() {
        let mut raw = transfer(false);
        raw.payload.fields_mut().clear(Field::Nonce);
        assert_matches!(validate(&raw), Err(SchemaError::MissingField(Field::Nonce)));
    }

    #[test]
    fn rejects_wrong_length() {
        let mut raw = transfer(false);
        raw.payload.fields_mut().set(Field::Amount, vec![0u8; 15]);
        assert_matches!(
            validate(&raw),
            Err(SchemaError::FieldLength {
                field: Field::Amount,
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn rejects_any_partial_cosign_subset() {
        for missing in COSIGN_FIELDS {
            let mut raw = transfer(true);
            raw.payload.fields_mut().clear(missing);
            assert_matches!(validate(&raw), Err(SchemaError::PartialCosignature));
        }
        for only in COSIGN_FIELDS {
            let mut raw = transfer(false);
            raw.payload.fields_mut().set(only, vec![0u8; only.byte_length()]);
            assert_matches!(validate(&raw), Err(SchemaError::PartialCosignature));
        }
    }

    #[test]
    fn admin_families_reject_cosign_fields() {
        let mut payload = RawPayload::empty(PayloadFamily::AdminControl);
        let fields = payload.fields_mut();
        fields.set(Field::Tx, vec![1u8; 32]);
        fields.set(Field::TxValidity, vec![2u8; 32]);
        fields.set(Field::Target, address(3));
        fields.set(Field::Nonce, vec![4u8; 32]);
        fields.set(Field::Signature, vec![5u8; 64]);
        fields.set(Field::ValidatorAddress, address(6));
        fields.set(Field::ValidatorNonce, vec![7u8; 32]);
        fields.set(Field::ValidatorSignature, vec![8u8; 64]);
        let raw = RawOperation {
            kind: OperationKind::AppendWhitelist.as_u32(),
            address: Some(address(9)),
            payload,
        };
        assert_matches!(validate(&raw), Err(SchemaError::UnknownField { .. }));
    }
}
