//! License and writer registries
//!
//! Both are append-only: a counter key plus one index entry per position.
//! Licenses are issued once per address and survive bans; writer registry
//! positions are appended the first time a writing key is bound.

use msb_core::records::counter;
use msb_core::{keys, Address, WriterKey};

use super::Transition;
use crate::error::{ApplyError, Rejection};

impl Transition<'_> {
    /// Issue the next license id to `address`
    pub(crate) fn assign_license(&mut self, address: &Address) -> Result<u32, ApplyError> {
        let id = self
            .reader()
            .license_count()?
            .checked_add(1)
            .ok_or(Rejection::LicensesExhausted)?;
        let scope = self.scope_mut();
        scope.put(keys::license_index(id), address.as_bytes().to_vec());
        scope.put(keys::LICENSE_COUNT, counter::encode(id).to_vec());
        Ok(id)
    }

    /// Bind `key` to `address`, appending a registry position on first binding
    pub(crate) fn bind_writer_key(&mut self, key: &WriterKey, address: &Address) -> Result<(), ApplyError> {
        match self.reader().writer_owner(key)? {
            Some(owner) if owner == *address => return Ok(()),
            Some(_) => return Err(Rejection::WriterKeyInUse.into()),
            None => {}
        }
        let position = self.reader().writers_length()?;
        let length = position
            .checked_add(1)
            .ok_or(Rejection::WriterRegistryExhausted)?;
        let scope = self.scope_mut();
        scope.put(keys::writer_index(position), address.as_bytes().to_vec());
        scope.put(keys::WRITERS_LENGTH, counter::encode(length).to_vec());
        scope.put(keys::writer_address(key), address.as_bytes().to_vec());
        Ok(())
    }

    /// Rebind `key` to `address` without appending a registry position
    pub(crate) fn rebind_writer_key(&mut self, key: &WriterKey, address: &Address) {
        self.scope_mut()
            .put(keys::writer_address(key), address.as_bytes().to_vec());
    }

    /// Fail when `key` is bound to anyone but `address`
    pub(crate) fn ensure_key_available(&self, key: &WriterKey, address: &Address) -> Result<(), ApplyError> {
        match self.reader().writer_owner(key)? {
            Some(owner) if owner != *address => Err(Rejection::WriterKeyInUse.into()),
            _ => Ok(()),
        }
    }
}
