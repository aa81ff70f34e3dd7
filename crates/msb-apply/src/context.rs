//! Inputs the replication substrate hands to the engine

use msb_core::{Hash32, WriterKey};

use crate::membership::MembershipSet;

/// One operation as delivered by the substrate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredOperation {
    /// Writer key of the log the operation was appended to
    pub from: WriterKey,
    /// Raw wire bytes
    pub value: Vec<u8>,
}

impl DeliveredOperation {
    /// Wrap `value` appended by `from`
    pub fn new(from: WriterKey, value: Vec<u8>) -> Self {
        Self { from, value }
    }
}

/// Ledger-wide facts fixed for the duration of one apply call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyContext {
    /// Bootstrap writer key of this ledger
    pub bootstrap: WriterKey,
    /// Current membership-sequence digest; operations must name it as `txv`
    pub tx_validity: Hash32,
    /// Validator set before the first operation of the call
    pub membership: MembershipSet,
}
