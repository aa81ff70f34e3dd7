//! Whitelisting and bans

use tracing::debug;

use msb_core::{Address, RoleMask};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

/// Whitelist `target`, issuing a license on first whitelisting
pub(crate) fn append_whitelist(t: &mut Transition<'_>, target: &Address) -> Result<(), ApplyError> {
    let admin = t.require_admin()?;
    let node = t.node(target)?.unwrap_or_default();
    if node.is_whitelisted() {
        return Err(Rejection::AlreadyWhitelisted.into());
    }

    let license = if node.has_license() {
        node.license
    } else {
        t.assign_license(target)?
    };
    t.put_node(
        target,
        &node.with_role(RoleMask::WHITELISTED).with_license(license),
    );
    t.settle(&admin.address, FeePolicy::AdminWaivable, None)?;

    debug!(target = %target, license, "whitelisted");
    Ok(())
}

/// Clear every role of `target`
///
/// Indexers must be demoted first so that a ban never changes membership.
pub(crate) fn ban_validator(t: &mut Transition<'_>, target: &Address) -> Result<(), ApplyError> {
    let admin = t.require_admin()?;
    if *target == admin.address {
        return Err(Rejection::TargetIsAdmin.into());
    }
    let node = t.existing_node(target, Rejection::NotWhitelisted)?;
    if !node.is_whitelisted() {
        return Err(Rejection::NotWhitelisted.into());
    }
    if node.is_indexer() {
        return Err(Rejection::TargetIsIndexer.into());
    }

    t.put_node(target, &node.with_role(RoleMask::NONE));
    t.settle(&admin.address, FeePolicy::AdminWaivable, None)?;

    debug!(target = %target, "banned");
    Ok(())
}
