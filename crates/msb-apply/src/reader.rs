//! Typed reads over any view layer

use msb_core::records::{counter, INITIALIZATION_DISABLED};
use msb_core::{keys, Address, AdminRecord, CodecError, DeploymentRecord, Hash32, NodeRecord, WriterKey};

use crate::view::{ReadView, ViewError};

/// Decodes ledger records out of a [`ReadView`]
pub struct LedgerReader<'v, V: ReadView + ?Sized> {
    view: &'v V,
}

impl<'v, V: ReadView + ?Sized> LedgerReader<'v, V> {
    /// Read through `view`
    pub fn new(view: &'v V) -> Self {
        Self { view }
    }

    /// Node record of `address`
    pub fn node(&self, address: &Address) -> Result<Option<NodeRecord>, ViewError> {
        self.view
            .get(&keys::node(address))?
            .map(|bytes| NodeRecord::decode(&bytes))
            .transpose()
            .map_err(ViewError::from)
    }

    /// The admin record
    pub fn admin(&self) -> Result<Option<AdminRecord>, ViewError> {
        self.view
            .get(keys::ADMIN)?
            .map(|bytes| AdminRecord::decode(&bytes))
            .transpose()
            .map_err(ViewError::from)
    }

    /// Whether the initialization phase is still open; absent means open
    pub fn initialization_enabled(&self) -> Result<bool, ViewError> {
        Ok(match self.view.get(keys::INITIALIZATION)?.as_deref() {
            None => true,
            Some([flag]) => *flag != INITIALIZATION_DISABLED,
            Some(other) => {
                return Err(CodecError::length("initialization flag", 1, other.len()).into())
            }
        })
    }

    /// Number of entries in the writer registry
    pub fn writers_length(&self) -> Result<u32, ViewError> {
        self.counter(keys::WRITERS_LENGTH)
    }

    /// Address at position `index` of the writer registry
    pub fn writer_at(&self, index: u32) -> Result<Option<Address>, ViewError> {
        self.address(&keys::writer_index(index))
    }

    /// Address currently bound to writing key `key`
    pub fn writer_owner(&self, key: &WriterKey) -> Result<Option<Address>, ViewError> {
        self.address(&keys::writer_address(key))
    }

    /// Number of licenses issued so far
    pub fn license_count(&self) -> Result<u32, ViewError> {
        self.counter(keys::LICENSE_COUNT)
    }

    /// Holder of license `id`
    pub fn license_owner(&self, id: u32) -> Result<Option<Address>, ViewError> {
        self.address(&keys::license_index(id))
    }

    /// Deployment record of external bootstrap `bootstrap`
    pub fn deployment(&self, bootstrap: &WriterKey) -> Result<Option<DeploymentRecord>, ViewError> {
        self.view
            .get(&keys::deployment(bootstrap))?
            .map(|bytes| DeploymentRecord::decode(&bytes))
            .transpose()
            .map_err(ViewError::from)
    }

    /// Whether operation `tx` was already applied
    pub fn is_applied(&self, tx: &Hash32) -> Result<bool, ViewError> {
        Ok(self.view.get(&keys::replay(tx))?.is_some())
    }

    /// Raw operation bytes recorded for `tx`
    pub fn applied_operation(&self, tx: &Hash32) -> Result<Option<Vec<u8>>, ViewError> {
        Ok(self.view.get(&keys::replay(tx))?)
    }

    fn counter(&self, key: &str) -> Result<u32, ViewError> {
        match self.view.get(key)? {
            Some(bytes) => Ok(counter::decode(&bytes)?),
            None => Ok(0),
        }
    }

    fn address(&self, key: &str) -> Result<Option<Address>, ViewError> {
        self.view
            .get(key)?
            .map(|bytes| {
                Address::parse(&bytes).map_err(|_| CodecError::domain("registry entry", "address"))
            })
            .transpose()
            .map_err(ViewError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{KvStore, MemoryStore, WriteSet};
    use assert_matches::assert_matches;
    use msb_core::Balance;

    fn store_with(entries: Vec<(String, Vec<u8>)>) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.commit(entries.into_iter().collect::<WriteSet>()).unwrap();
        store
    }

    #[test]
    fn empty_view_defaults() {
        let store = MemoryStore::new();
        let reader = LedgerReader::new(&store);
        assert_eq!(reader.admin().unwrap(), None);
        assert!(reader.initialization_enabled().unwrap());
        assert_eq!(reader.writers_length().unwrap(), 0);
        assert_eq!(reader.license_count().unwrap(), 0);
        assert!(!reader.is_applied(&Hash32::ZERO).unwrap());
    }

    #[test]
    fn decodes_stored_records() {
        let address = Address::from_key_bytes(&[1u8; 32]);
        let key = WriterKey::new([2u8; 32]);
        let node = NodeRecord::with_initial_balance(Balance::ONE).with_writing_key(key);
        let store = store_with(vec![
            (keys::node(&address), node.encode().to_vec()),
            (keys::writer_address(&key), address.as_bytes().to_vec()),
            (keys::LICENSE_COUNT.to_string(), counter::encode(4).to_vec()),
            (keys::INITIALIZATION.to_string(), vec![INITIALIZATION_DISABLED]),
        ]);
        let reader = LedgerReader::new(&store);

        assert_eq!(reader.node(&address).unwrap(), Some(node));
        assert_eq!(reader.writer_owner(&key).unwrap(), Some(address));
        assert_eq!(reader.license_count().unwrap(), 4);
        assert!(!reader.initialization_enabled().unwrap());
    }

    #[test]
    fn corrupt_records_surface_as_codec_errors() {
        let address = Address::from_key_bytes(&[1u8; 32]);
        let store = store_with(vec![
            (keys::node(&address), vec![0u8; 3]),
            (keys::writer_index(0), b"not an address".to_vec()),
        ]);
        let reader = LedgerReader::new(&store);
        assert_matches!(reader.node(&address), Err(ViewError::Codec(_)));
        assert_matches!(reader.writer_at(0), Err(ViewError::Codec(_)));
    }
}
