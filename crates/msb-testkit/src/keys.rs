//! Participant key fixtures
//!
//! Every key is derived from a seed string through SHA-256 so that tests are
//! reproducible and readable: `Participant::from_seed_string("alice")` is the
//! same participant in every run.

use ed25519_dalek::SigningKey;
use sha2::{Digest, Sha256};

use msb_core::{Address, WriterKey};

fn seed_bytes(seed: &str) -> [u8; 32] {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    bytes
}

/// Writing key derived from `seed`
pub fn writer_key_from_seed(seed: &str) -> WriterKey {
    WriterKey::new(seed_bytes(&format!("writer/{seed}")))
}

/// A ledger participant: a wallet key plus the writing key of its log
#[derive(Debug, Clone)]
pub struct Participant {
    name: String,
    signing_key: SigningKey,
    address: Address,
    writing_key: WriterKey,
}

impl Participant {
    /// Participant derived from `seed`
    pub fn from_seed_string(seed: &str) -> Self {
        let signing_key = SigningKey::from_bytes(&seed_bytes(seed));
        let address = Address::from_public_key(&signing_key.verifying_key());
        Self {
            name: seed.to_string(),
            signing_key,
            address,
            writing_key: writer_key_from_seed(seed),
        }
    }

    /// Same wallet, different writing key
    pub fn with_writing_key(mut self, writing_key: WriterKey) -> Self {
        self.writing_key = writing_key;
        self
    }

    /// Seed the participant was derived from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wallet signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Wallet address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Writing key of the participant's log
    pub fn writing_key(&self) -> WriterKey {
        self.writing_key
    }
}
