//! View key-space
//!
//! Node records live under the bare address. Addresses always start with
//! `trac1` and replay markers are 64 hex characters, so neither can collide
//! with the reserved keys below.

use crate::address::Address;
use crate::types::{Hash32, WriterKey};

/// Admin record singleton
pub const ADMIN: &str = "admin";

/// Initialization flag singleton
pub const INITIALIZATION: &str = "initialization";

/// Number of writer registry entries
pub const WRITERS_LENGTH: &str = "writers/length";

/// Highest license id assigned so far
pub const LICENSE_COUNT: &str = "license/count";

/// Node record of `address`
pub fn node(address: &Address) -> String {
    address.as_str().to_owned()
}

/// Current owner of a writing key
pub fn writer_address(key: &WriterKey) -> String {
    format!("writer/address/{}", key.to_hex())
}

/// Writer registry slot `index`
pub fn writer_index(index: u32) -> String {
    format!("writers/index/{index}")
}

/// Owner of license `id`
pub fn license_index(id: u32) -> String {
    format!("license/index/{id}")
}

/// Deployment record of an external bootstrap key
pub fn deployment(bootstrap: &WriterKey) -> String {
    format!("deployment/{}", bootstrap.to_hex())
}

/// Replay marker of an applied operation
pub fn replay(tx: &Hash32) -> String {
    tx.to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes() {
        let key = WriterKey::new([0xaa; 32]);
        assert_eq!(writer_address(&key), format!("writer/address/{}", "aa".repeat(32)));
        assert_eq!(writer_index(3), "writers/index/3");
        assert_eq!(license_index(12), "license/index/12");
        assert_eq!(deployment(&key), format!("deployment/{}", "aa".repeat(32)));
        assert_eq!(replay(&Hash32::new([1u8; 32])), "01".repeat(32));

        let address = Address::from_key_bytes(&[2u8; 32]);
        assert_eq!(node(&address), address.as_str());
    }
}
