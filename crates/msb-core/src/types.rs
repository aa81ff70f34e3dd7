//! Fixed-width identifiers carried by operations and records

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of hashes, writing keys and nonces
pub const KEY_BYTE_LENGTH: usize = 32;

/// Width of an ed25519 signature
pub const SIGNATURE_BYTE_LENGTH: usize = 64;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(#[serde(with = "serde_array")] pub [u8; $len]);

        impl $name {
            /// Byte width of this identifier
            pub const LENGTH: usize = $len;

            /// Wrap raw bytes
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copy from a slice of exactly the right width
            pub fn from_slice(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(Self)
            }

            /// Borrow the raw bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lowercase hex rendering
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_bytes!(
    /// SHA-256 digest (operation hash, tx-validity digest, content hash)
    Hash32,
    KEY_BYTE_LENGTH
);

fixed_bytes!(
    /// Public key of an append-log writer
    WriterKey,
    KEY_BYTE_LENGTH
);

fixed_bytes!(
    /// Random per-signature nonce
    Nonce,
    KEY_BYTE_LENGTH
);

fixed_bytes!(
    /// Raw ed25519 signature bytes
    SignatureBytes,
    SIGNATURE_BYTE_LENGTH
);

impl Hash32 {
    /// All-zero digest
    pub const ZERO: Hash32 = Hash32([0u8; KEY_BYTE_LENGTH]);
}

/// serde support for arrays wider than 32 bytes
mod serde_array {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"fixed-width byte array"))
    }
}
