//! Indexer promotion and demotion
//!
//! These are the only kinds where the admin pays the fee even during
//! initialization.

use tracing::info;

use msb_core::{Address, RoleMask};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

pub(crate) fn add_indexer(t: &mut Transition<'_>, target: &Address) -> Result<(), ApplyError> {
    let admin = t.require_admin()?;
    let node = t.existing_node(target, Rejection::NotWriter)?;
    if !node.is_writer() {
        return Err(Rejection::NotWriter.into());
    }
    if node.is_indexer() {
        return Err(Rejection::AlreadyIndexer.into());
    }

    t.add_member(node.writing_key)?;
    t.put_node(target, &node.with_role(RoleMask::INDEXER));
    t.settle(&admin.address, FeePolicy::Charged, None)?;

    info!(target = %target, key = %node.writing_key, "indexer added");
    Ok(())
}

pub(crate) fn remove_indexer(t: &mut Transition<'_>, target: &Address) -> Result<(), ApplyError> {
    let admin = t.require_admin()?;
    let node = t.existing_node(target, Rejection::NotIndexer)?;
    if !node.is_indexer() {
        return Err(Rejection::NotIndexer.into());
    }

    t.remove_member(node.writing_key)?;
    t.put_node(target, &node.with_role(RoleMask::WRITER));
    t.settle(&admin.address, FeePolicy::Charged, None)?;

    info!(target = %target, key = %node.writing_key, "indexer removed");
    Ok(())
}
