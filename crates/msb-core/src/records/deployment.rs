//! Deployment record: `requesterAddress(69) | txHash(32)`
//!
//! Binds an externally deployed bootstrap key to the address that registered
//! it. The first registration wins.

use crate::address::{Address, ADDRESS_BYTE_LENGTH};
use crate::errors::{CodecError, CodecResult};
use crate::types::{Hash32, KEY_BYTE_LENGTH};

/// Width of an encoded deployment record
pub const DEPLOYMENT_RECORD_LENGTH: usize = ADDRESS_BYTE_LENGTH + KEY_BYTE_LENGTH;

const RECORD: &str = "deployment record";

/// Registration of an external bootstrap key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// Address that paid for the registration
    pub requester: Address,
    /// Hash of the registering operation
    pub tx: Hash32,
}

impl DeploymentRecord {
    /// Encode into the fixed layout
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DEPLOYMENT_RECORD_LENGTH);
        out.extend_from_slice(self.requester.as_bytes());
        out.extend_from_slice(self.tx.as_bytes());
        out
    }

    /// Decode, rejecting any other length or a malformed address
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() != DEPLOYMENT_RECORD_LENGTH {
            return Err(CodecError::length(
                RECORD,
                DEPLOYMENT_RECORD_LENGTH,
                bytes.len(),
            ));
        }
        let (requester, tx) = bytes.split_at(ADDRESS_BYTE_LENGTH);
        Ok(Self {
            requester: Address::parse(requester)
                .map_err(|_| CodecError::domain(RECORD, "requester"))?,
            tx: Hash32::from_slice(tx).ok_or_else(|| CodecError::domain(RECORD, "tx"))?,
        })
    }
}
