//! Admin record: `address(69) | writingKey(32)`

use crate::address::{Address, ADDRESS_BYTE_LENGTH};
use crate::errors::{CodecError, CodecResult};
use crate::types::{WriterKey, KEY_BYTE_LENGTH};

/// Width of an encoded admin record
pub const ADMIN_RECORD_LENGTH: usize = ADDRESS_BYTE_LENGTH + KEY_BYTE_LENGTH;

const RECORD: &str = "admin record";

/// The ledger's single administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    /// Admin address; fixed for the lifetime of the ledger
    pub address: Address,
    /// Current writing key; rotated by admin recovery
    pub writing_key: WriterKey,
}

impl AdminRecord {
    /// Encode into the fixed layout
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ADMIN_RECORD_LENGTH);
        out.extend_from_slice(self.address.as_bytes());
        out.extend_from_slice(self.writing_key.as_bytes());
        out
    }

    /// Decode, rejecting any other length or a malformed address
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() != ADMIN_RECORD_LENGTH {
            return Err(CodecError::length(RECORD, ADMIN_RECORD_LENGTH, bytes.len()));
        }
        let (address, key) = bytes.split_at(ADDRESS_BYTE_LENGTH);
        let address = Address::parse(address).map_err(|_| CodecError::domain(RECORD, "address"))?;
        let writing_key =
            WriterKey::from_slice(key).ok_or_else(|| CodecError::domain(RECORD, "writing key"))?;
        Ok(Self {
            address,
            writing_key,
        })
    }

    /// Copy with a rotated writing key
    pub fn with_writing_key(&self, writing_key: WriterKey) -> Self {
        Self {
            address: self.address.clone(),
            writing_key,
        }
    }
}

/// Replace the writing key of an encoded admin record
pub fn set_writing_key(record: &[u8], key: &[u8]) -> CodecResult<Vec<u8>> {
    let key = WriterKey::from_slice(key)
        .ok_or_else(|| CodecError::length("writing key", KEY_BYTE_LENGTH, key.len()))?;
    Ok(AdminRecord::decode(record)?.with_writing_key(key).encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AdminRecord {
        AdminRecord {
            address: Address::from_key_bytes(&[1u8; 32]),
            writing_key: WriterKey::new([2u8; 32]),
        }
    }

    #[test]
    fn round_trip() {
        let record = sample();
        let encoded = record.encode();
        assert_eq!(encoded.len(), ADMIN_RECORD_LENGTH);
        assert_eq!(AdminRecord::decode(&encoded), Ok(record));
    }

    #[test]
    fn rejects_bad_buffers() {
        let encoded = sample().encode();
        assert!(AdminRecord::decode(&encoded[..100]).is_err());
        let mut corrupt = encoded.clone();
        corrupt[0] = b'X';
        assert!(AdminRecord::decode(&corrupt).is_err());
    }

    #[test]
    fn rotating_key_keeps_address() {
        let encoded = sample().encode();
        let rotated = AdminRecord::decode(&set_writing_key(&encoded, &[8u8; 32]).unwrap()).unwrap();
        assert_eq!(rotated.address, sample().address);
        assert_eq!(rotated.writing_key, WriterKey::new([8u8; 32]));
        assert!(set_writing_key(&encoded, &[8u8; 33]).is_err());
    }
}
