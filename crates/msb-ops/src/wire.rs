//! Raw operation wire format
//!
//! The wire shape mirrors what arrives from the log: a type discriminant, the
//! requester address and exactly one payload variant whose fields are all
//! optional. Nothing here is trusted; [`crate::schema::validate`] turns a
//! [`RawOperation`] into a typed [`crate::Operation`].

use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use msb_core::ErrorCode;

use crate::kind::{Field, PayloadFamily};

/// Upper bound on an encoded operation
pub const MAX_OPERATION_BYTES: u64 = 4096;

/// Optional byte fields of a payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFields {
    /// `tx`
    pub tx: Option<Vec<u8>>,
    /// `txv`
    pub tx_validity: Option<Vec<u8>>,
    /// `iw`
    pub writing_key: Option<Vec<u8>>,
    /// `ia`
    pub target: Option<Vec<u8>>,
    /// `in`
    pub nonce: Option<Vec<u8>>,
    /// `is`
    pub signature: Option<Vec<u8>>,
    /// `am`
    pub amount: Option<Vec<u8>>,
    /// `to`
    pub recipient: Option<Vec<u8>>,
    /// `ch`
    pub content_hash: Option<Vec<u8>>,
    /// `bs`
    pub external_bootstrap: Option<Vec<u8>>,
    /// `mbs`
    pub msb_bootstrap: Option<Vec<u8>>,
    /// `ic`
    pub channel: Option<Vec<u8>>,
    /// `va`
    pub validator_address: Option<Vec<u8>>,
    /// `vn`
    pub validator_nonce: Option<Vec<u8>>,
    /// `vs`
    pub validator_signature: Option<Vec<u8>>,
}

impl PayloadFields {
    /// Borrow a field by name
    pub fn get(&self, field: Field) -> Option<&[u8]> {
        self.slot(field).as_deref()
    }

    /// Set a field
    pub fn set(&mut self, field: Field, value: impl Into<Vec<u8>>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Remove a field
    pub fn clear(&mut self, field: Field) {
        *self.slot_mut(field) = None;
    }

    /// Fields that are present, in canonical order
    pub fn present(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(move |field| self.slot(*field).is_some())
    }

    fn slot(&self, field: Field) -> &Option<Vec<u8>> {
        match field {
            Field::Tx => &self.tx,
            Field::TxValidity => &self.tx_validity,
            Field::WritingKey => &self.writing_key,
            Field::Target => &self.target,
            Field::Nonce => &self.nonce,
            Field::Signature => &self.signature,
            Field::Amount => &self.amount,
            Field::Recipient => &self.recipient,
            Field::ContentHash => &self.content_hash,
            Field::ExternalBootstrap => &self.external_bootstrap,
            Field::MsbBootstrap => &self.msb_bootstrap,
            Field::Channel => &self.channel,
            Field::ValidatorAddress => &self.validator_address,
            Field::ValidatorNonce => &self.validator_nonce,
            Field::ValidatorSignature => &self.validator_signature,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<Vec<u8>> {
        match field {
            Field::Tx => &mut self.tx,
            Field::TxValidity => &mut self.tx_validity,
            Field::WritingKey => &mut self.writing_key,
            Field::Target => &mut self.target,
            Field::Nonce => &mut self.nonce,
            Field::Signature => &mut self.signature,
            Field::Amount => &mut self.amount,
            Field::Recipient => &mut self.recipient,
            Field::ContentHash => &mut self.content_hash,
            Field::ExternalBootstrap => &mut self.external_bootstrap,
            Field::MsbBootstrap => &mut self.msb_bootstrap,
            Field::Channel => &mut self.channel,
            Field::ValidatorAddress => &mut self.validator_address,
            Field::ValidatorNonce => &mut self.validator_nonce,
            Field::ValidatorSignature => &mut self.validator_signature,
        }
    }
}

/// Payload variant; exactly one is carried per operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawPayload {
    /// Core admin payload
    CoreAdmin(PayloadFields),
    /// Admin control payload
    AdminControl(PayloadFields),
    /// Role access payload
    RoleAccess(PayloadFields),
    /// Balance initialization payload
    BalanceInitialization(PayloadFields),
    /// Transfer payload
    Transfer(PayloadFields),
    /// Transaction payload
    Transaction(PayloadFields),
    /// Bootstrap deployment payload
    BootstrapDeployment(PayloadFields),
}

impl RawPayload {
    /// Empty payload of a family
    pub fn empty(family: PayloadFamily) -> Self {
        let fields = PayloadFields::default();
        match family {
            PayloadFamily::CoreAdmin => RawPayload::CoreAdmin(fields),
            PayloadFamily::AdminControl => RawPayload::AdminControl(fields),
            PayloadFamily::RoleAccess => RawPayload::RoleAccess(fields),
            PayloadFamily::BalanceInitialization => RawPayload::BalanceInitialization(fields),
            PayloadFamily::Transfer => RawPayload::Transfer(fields),
            PayloadFamily::Transaction => RawPayload::Transaction(fields),
            PayloadFamily::BootstrapDeployment => RawPayload::BootstrapDeployment(fields),
        }
    }

    /// Family of the carried variant
    pub fn family(&self) -> PayloadFamily {
        match self {
            RawPayload::CoreAdmin(_) => PayloadFamily::CoreAdmin,
            RawPayload::AdminControl(_) => PayloadFamily::AdminControl,
            RawPayload::RoleAccess(_) => PayloadFamily::RoleAccess,
            RawPayload::BalanceInitialization(_) => PayloadFamily::BalanceInitialization,
            RawPayload::Transfer(_) => PayloadFamily::Transfer,
            RawPayload::Transaction(_) => PayloadFamily::Transaction,
            RawPayload::BootstrapDeployment(_) => PayloadFamily::BootstrapDeployment,
        }
    }

    /// Borrow the field bag
    pub fn fields(&self) -> &PayloadFields {
        match self {
            RawPayload::CoreAdmin(fields)
            | RawPayload::AdminControl(fields)
            | RawPayload::RoleAccess(fields)
            | RawPayload::BalanceInitialization(fields)
            | RawPayload::Transfer(fields)
            | RawPayload::Transaction(fields)
            | RawPayload::BootstrapDeployment(fields) => fields,
        }
    }

    /// Mutably borrow the field bag
    pub fn fields_mut(&mut self) -> &mut PayloadFields {
        match self {
            RawPayload::CoreAdmin(fields)
            | RawPayload::AdminControl(fields)
            | RawPayload::RoleAccess(fields)
            | RawPayload::BalanceInitialization(fields)
            | RawPayload::Transfer(fields)
            | RawPayload::Transaction(fields)
            | RawPayload::BootstrapDeployment(fields) => fields,
        }
    }
}

/// Operation as decoded from the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOperation {
    /// Type discriminant
    pub kind: u32,
    /// Requester address
    pub address: Option<Vec<u8>>,
    /// Payload variant
    pub payload: RawPayload,
}

/// The operation bytes are not a well-formed [`RawOperation`]
#[derive(Debug, Error)]
#[error("malformed operation: {0}")]
pub struct DecodeError(#[from] bincode::Error);

impl ErrorCode for DecodeError {
    fn code(&self) -> &'static str {
        "operation_decode"
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_OPERATION_BYTES)
        .reject_trailing_bytes()
}

impl RawOperation {
    /// Decode wire bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(options().deserialize(bytes)?)
    }

    /// Encode to wire bytes; fails only past [`MAX_OPERATION_BYTES`]
    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        options().serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawOperation {
        let mut payload = RawPayload::empty(PayloadFamily::Transfer);
        payload.fields_mut().set(Field::Tx, vec![1u8; 32]);
        payload.fields_mut().set(Field::Amount, vec![2u8; 16]);
        RawOperation {
            kind: 13,
            address: Some(b"trac1".to_vec()),
            payload,
        }
    }

    #[test]
    fn decode_inverts_encode() {
        let op = sample();
        let bytes = op.encode().unwrap();
        assert_eq!(RawOperation::decode(&bytes).unwrap(), op);
    }

    #[test]
    fn rejects_trailing_and_truncated_bytes() {
        let mut bytes = sample().encode().unwrap();
        assert!(RawOperation::decode(&bytes[..bytes.len() - 1]).is_err());
        bytes.push(0);
        assert!(RawOperation::decode(&bytes).is_err());
        assert!(RawOperation::decode(&[]).is_err());
    }

    #[test]
    fn present_lists_set_fields() {
        let op = sample();
        let present: Vec<_> = op.payload.fields().present().collect();
        assert_eq!(present, vec![Field::Tx, Field::Amount]);

        let mut fields = op.payload.fields().clone();
        fields.clear(Field::Tx);
        assert_eq!(fields.get(Field::Tx), None);
        assert_eq!(fields.get(Field::Amount), Some(&[2u8; 16][..]));
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..512)) {
            if let Ok(raw) = RawOperation::decode(&bytes) {
                let _ = crate::schema::validate(&raw);
            }
        }

        #[test]
        fn every_strict_prefix_fails(cut in 0usize..64) {
            let bytes = sample().encode().unwrap();
            let cut = cut % bytes.len();
            proptest::prop_assert!(RawOperation::decode(&bytes[..cut]).is_err());
        }
    }
}
