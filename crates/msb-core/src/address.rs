//! Participant addresses
//!
//! An address is the human-readable prefix `trac1` followed by the lowercase
//! hex encoding of the participant's ed25519 public key. Addresses are stored
//! verbatim (69 ASCII bytes) as view keys and inside records, so the encoding
//! is fixed-width and canonical: uppercase hex is rejected.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::errors::AddressError;
use crate::types::KEY_BYTE_LENGTH;

/// Human-readable prefix, including the separator
pub const ADDRESS_PREFIX: &str = "trac1";

/// Width of an encoded address
pub const ADDRESS_BYTE_LENGTH: usize = ADDRESS_PREFIX.len() + 2 * KEY_BYTE_LENGTH;

/// Canonical participant address
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Address(String);

impl Address {
    /// Derive the address of a public key
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        Self::from_key_bytes(key.as_bytes())
    }

    /// Derive the address of raw public key bytes
    pub fn from_key_bytes(key: &[u8; KEY_BYTE_LENGTH]) -> Self {
        Self(format!("{ADDRESS_PREFIX}{}", hex::encode(key)))
    }

    /// Parse an encoded address, checking width, prefix and hex alphabet.
    ///
    /// The key is not checked for being a curve point here; see
    /// [`Address::public_key`].
    pub fn parse(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_BYTE_LENGTH {
            return Err(AddressError::Length {
                expected: ADDRESS_BYTE_LENGTH,
                actual: bytes.len(),
            });
        }
        let (prefix, key) = bytes.split_at(ADDRESS_PREFIX.len());
        if prefix != ADDRESS_PREFIX.as_bytes() {
            return Err(AddressError::Prefix);
        }
        if !key.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(AddressError::Encoding);
        }
        // all bytes are ASCII at this point
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| AddressError::Encoding)?;
        Ok(Self(text))
    }

    /// Raw key bytes carried by this address
    pub fn key_bytes(&self) -> Result<[u8; KEY_BYTE_LENGTH], AddressError> {
        let mut key = [0u8; KEY_BYTE_LENGTH];
        let encoded = self
            .0
            .get(ADDRESS_PREFIX.len()..)
            .ok_or(AddressError::Encoding)?;
        hex::decode_to_slice(encoded, &mut key).map_err(|_| AddressError::Encoding)?;
        Ok(key)
    }

    /// Decode the ed25519 public key this address commits to
    pub fn public_key(&self) -> Result<VerifyingKey, AddressError> {
        VerifyingKey::from_bytes(&self.key_bytes()?).map_err(|_| AddressError::PublicKey)
    }

    /// Encoded form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encoded bytes as stored in records
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(text.as_bytes())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}
