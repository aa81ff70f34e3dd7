//! Node record: one per participant address
//!
//! Layout (69 bytes):
//!
//! ```text
//! role(1) | writingKey(32) | balance(16) | license(4, u32 BE) | stakedBalance(16)
//! ```

use crate::balance::{Balance, BALANCE_BYTE_LENGTH};
use crate::errors::{CodecError, CodecResult};
use crate::types::{WriterKey, KEY_BYTE_LENGTH};

/// Width of an encoded license id
pub const LICENSE_BYTE_LENGTH: usize = 4;

/// Width of an encoded node record
pub const NODE_RECORD_LENGTH: usize =
    1 + KEY_BYTE_LENGTH + BALANCE_BYTE_LENGTH + LICENSE_BYTE_LENGTH + BALANCE_BYTE_LENGTH;

/// License id that was never assigned
pub const NO_LICENSE: u32 = 0;

const RECORD: &str = "node record";

const ROLE_OFFSET: usize = 0;
const KEY_OFFSET: usize = 1;
const BALANCE_OFFSET: usize = KEY_OFFSET + KEY_BYTE_LENGTH;
const LICENSE_OFFSET: usize = BALANCE_OFFSET + BALANCE_BYTE_LENGTH;
const STAKE_OFFSET: usize = LICENSE_OFFSET + LICENSE_BYTE_LENGTH;

/// Three-bit role mask.
///
/// Roles are hierarchical: the accessors only report a role when every lower
/// bit is also set, so a corrupted byte with INDEXER set but WRITER clear is
/// neither a writer nor an indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RoleMask(u8);

impl RoleMask {
    /// Bit set for whitelisted participants
    pub const WHITELISTED_BIT: u8 = 0b001;
    /// Bit set for writers
    pub const WRITER_BIT: u8 = 0b010;
    /// Bit set for indexers
    pub const INDEXER_BIT: u8 = 0b100;

    /// No role
    pub const NONE: RoleMask = RoleMask(0);
    /// Whitelisted only
    pub const WHITELISTED: RoleMask = RoleMask(Self::WHITELISTED_BIT);
    /// Whitelisted writer
    pub const WRITER: RoleMask = RoleMask(Self::WHITELISTED_BIT | Self::WRITER_BIT);
    /// Whitelisted writer and indexer
    pub const INDEXER: RoleMask =
        RoleMask(Self::WHITELISTED_BIT | Self::WRITER_BIT | Self::INDEXER_BIT);

    /// Accept any three-bit value
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= 0b111).then_some(Self(bits))
    }

    /// Raw bits
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whitelisted bit is set
    pub fn is_whitelisted(self) -> bool {
        self.0 & Self::WHITELISTED_BIT != 0
    }

    /// Whitelisted and writer bits are set
    pub fn is_writer(self) -> bool {
        self.is_whitelisted() && self.0 & Self::WRITER_BIT != 0
    }

    /// All three bits are set
    pub fn is_indexer(self) -> bool {
        self.is_writer() && self.0 & Self::INDEXER_BIT != 0
    }
}

/// Decoded node record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    /// Role mask
    pub role: RoleMask,
    /// Writing key of the participant's append log, zero until it becomes a writer
    pub writing_key: WriterKey,
    /// Spendable balance
    pub balance: Balance,
    /// License id, [`NO_LICENSE`] until first whitelisting
    pub license: u32,
    /// Balance locked as writer stake
    pub staked_balance: Balance,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            role: RoleMask::NONE,
            writing_key: WriterKey::new([0u8; KEY_BYTE_LENGTH]),
            balance: Balance::ZERO,
            license: NO_LICENSE,
            staked_balance: Balance::ZERO,
        }
    }
}

impl NodeRecord {
    /// Record with only a balance, as created by balance initialization or
    /// an incoming transfer
    pub fn with_initial_balance(balance: Balance) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// Encode into the fixed layout
    pub fn encode(&self) -> [u8; NODE_RECORD_LENGTH] {
        let mut out = [0u8; NODE_RECORD_LENGTH];
        out[ROLE_OFFSET] = self.role.bits();
        out[KEY_OFFSET..BALANCE_OFFSET].copy_from_slice(self.writing_key.as_bytes());
        out[BALANCE_OFFSET..LICENSE_OFFSET].copy_from_slice(&self.balance.to_bytes());
        out[LICENSE_OFFSET..STAKE_OFFSET].copy_from_slice(&self.license.to_be_bytes());
        out[STAKE_OFFSET..].copy_from_slice(&self.staked_balance.to_bytes());
        out
    }

    /// Decode, rejecting any length other than [`NODE_RECORD_LENGTH`] and
    /// role bytes outside the three-bit mask
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() != NODE_RECORD_LENGTH {
            return Err(CodecError::length(RECORD, NODE_RECORD_LENGTH, bytes.len()));
        }
        let role = RoleMask::from_bits(bytes[ROLE_OFFSET])
            .ok_or_else(|| CodecError::domain(RECORD, "role"))?;
        let writing_key = WriterKey::from_slice(&bytes[KEY_OFFSET..BALANCE_OFFSET])
            .ok_or_else(|| CodecError::domain(RECORD, "writing key"))?;
        let balance = Balance::from_bytes(&bytes[BALANCE_OFFSET..LICENSE_OFFSET])
            .ok_or_else(|| CodecError::domain(RECORD, "balance"))?;
        let license = decode_license(&bytes[LICENSE_OFFSET..STAKE_OFFSET])
            .ok_or_else(|| CodecError::domain(RECORD, "license"))?;
        let staked_balance = Balance::from_bytes(&bytes[STAKE_OFFSET..])
            .ok_or_else(|| CodecError::domain(RECORD, "staked balance"))?;

        Ok(Self {
            role,
            writing_key,
            balance,
            license,
            staked_balance,
        })
    }

    /// Shorthand for `self.role.is_whitelisted()`
    pub fn is_whitelisted(&self) -> bool {
        self.role.is_whitelisted()
    }

    /// Shorthand for `self.role.is_writer()`
    pub fn is_writer(&self) -> bool {
        self.role.is_writer()
    }

    /// Shorthand for `self.role.is_indexer()`
    pub fn is_indexer(&self) -> bool {
        self.role.is_indexer()
    }

    /// True once a license id was assigned
    pub fn has_license(&self) -> bool {
        self.license != NO_LICENSE
    }

    /// Copy with a different role mask
    pub fn with_role(self, role: RoleMask) -> Self {
        Self { role, ..self }
    }

    /// Copy with a different spendable balance
    pub fn with_balance(self, balance: Balance) -> Self {
        Self { balance, ..self }
    }

    /// Copy with a different license id
    pub fn with_license(self, license: u32) -> Self {
        Self { license, ..self }
    }

    /// Copy with a different staked balance
    pub fn with_staked_balance(self, staked_balance: Balance) -> Self {
        Self {
            staked_balance,
            ..self
        }
    }

    /// Copy with a different writing key
    pub fn with_writing_key(self, writing_key: WriterKey) -> Self {
        Self {
            writing_key,
            ..self
        }
    }
}

fn decode_license(bytes: &[u8]) -> Option<u32> {
    let array: [u8; LICENSE_BYTE_LENGTH] = bytes.try_into().ok()?;
    Some(u32::from_be_bytes(array))
}

/// Replace the role byte of an encoded record
pub fn set_role(record: &[u8], role: u8) -> CodecResult<[u8; NODE_RECORD_LENGTH]> {
    let role = RoleMask::from_bits(role).ok_or_else(|| CodecError::domain(RECORD, "role"))?;
    Ok(NodeRecord::decode(record)?.with_role(role).encode())
}

/// Replace the balance of an encoded record
pub fn set_balance(record: &[u8], balance: &[u8]) -> CodecResult<[u8; NODE_RECORD_LENGTH]> {
    let balance = Balance::from_bytes(balance)
        .ok_or_else(|| CodecError::length("balance", BALANCE_BYTE_LENGTH, balance.len()))?;
    Ok(NodeRecord::decode(record)?.with_balance(balance).encode())
}

/// Replace the license id of an encoded record; the unassigned id is rejected
pub fn set_license(record: &[u8], license: &[u8]) -> CodecResult<[u8; NODE_RECORD_LENGTH]> {
    let license = decode_license(license)
        .ok_or_else(|| CodecError::length("license", LICENSE_BYTE_LENGTH, license.len()))?;
    if license == NO_LICENSE {
        return Err(CodecError::domain(RECORD, "license"));
    }
    Ok(NodeRecord::decode(record)?.with_license(license).encode())
}

/// Replace the staked balance of an encoded record
pub fn set_staked_balance(record: &[u8], staked: &[u8]) -> CodecResult<[u8; NODE_RECORD_LENGTH]> {
    let staked = Balance::from_bytes(staked)
        .ok_or_else(|| CodecError::length("staked balance", BALANCE_BYTE_LENGTH, staked.len()))?;
    Ok(NodeRecord::decode(record)?.with_staked_balance(staked).encode())
}

/// Replace the writing key of an encoded record
pub fn set_writing_key(record: &[u8], key: &[u8]) -> CodecResult<[u8; NODE_RECORD_LENGTH]> {
    let key = WriterKey::from_slice(key)
        .ok_or_else(|| CodecError::length("writing key", KEY_BYTE_LENGTH, key.len()))?;
    Ok(NodeRecord::decode(record)?.with_writing_key(key).encode())
}

/// Replace role and writing key together
pub fn set_role_and_writer_key(
    record: &[u8],
    role: u8,
    key: &[u8],
) -> CodecResult<[u8; NODE_RECORD_LENGTH]> {
    let patched = set_role(record, role)?;
    set_writing_key(&patched, key)
}
