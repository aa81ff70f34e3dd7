//! Hashing and signature verification
//!
//! SHA-256 is the single hash algorithm used for operation hashes and
//! validator messages. All replicas must agree on it, so it is selected here
//! and nowhere else.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::types::{Hash32, SignatureBytes};

/// Hash a single buffer
pub fn hash(data: &[u8]) -> Hash32 {
    hash_parts(&[data])
}

/// Hash the concatenation of several buffers without allocating
pub fn hash_parts(parts: &[&[u8]]) -> Hash32 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Hash32::new(hasher.finalize().into())
}

/// Verify an ed25519 signature over `message`
pub fn verify(key: &VerifyingKey, message: &[u8], signature: &SignatureBytes) -> bool {
    let signature = Signature::from_bytes(signature.as_bytes());
    key.verify(message, &signature).is_ok()
}
