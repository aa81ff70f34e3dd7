//! Canonical signing messages
//!
//! Requester message: `kind (u32 BE) || address || txv || body fields || nonce`.
//! Its SHA-256 digest is the operation hash `tx`, which the requester signs.
//!
//! Validator message: `tx || va || vn`. The validator signs its SHA-256 digest.

use msb_core::crypto::hash_parts;
use msb_core::{Address, Hash32, Nonce};

use crate::kind::OperationKind;
use crate::operation::OperationBody;

/// Hash of the requester message
pub fn requester_hash(
    kind: OperationKind,
    requester: &Address,
    tx_validity: &Hash32,
    body: &OperationBody,
    nonce: &Nonce,
) -> Hash32 {
    let kind_bytes = kind.as_u32().to_be_bytes();
    let body_parts = body.message_parts();

    let mut parts: Vec<&[u8]> = Vec::with_capacity(body_parts.len() + 4);
    parts.push(&kind_bytes);
    parts.push(requester.as_bytes());
    parts.push(tx_validity.as_bytes());
    parts.extend(body_parts.iter().map(Vec::as_slice));
    parts.push(nonce.as_bytes());
    hash_parts(&parts)
}

/// Hash of the validator message
pub fn validator_hash(tx: &Hash32, validator: &Address, nonce: &Nonce) -> Hash32 {
    hash_parts(&[tx.as_bytes(), validator.as_bytes(), nonce.as_bytes()])
}
