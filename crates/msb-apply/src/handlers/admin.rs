//! Admin registration and the initialization phase

use tracing::info;

use msb_core::records::{INITIALIZATION_DISABLED, INITIALIZATION_ENABLED};
use msb_core::{keys, Address, AdminRecord, Balance, NodeRecord, RoleMask, WriterKey};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

/// Register the requester as admin, appended by the ledger's bootstrap writer
pub(crate) fn add_admin(t: &mut Transition<'_>, writing_key: WriterKey) -> Result<(), ApplyError> {
    if t.reader().admin()?.is_some() {
        return Err(Rejection::AdminExists.into());
    }
    if t.from != t.context.bootstrap || writing_key != t.context.bootstrap {
        return Err(Rejection::NotBootstrapWriter.into());
    }

    let requester = t.op.requester.clone();
    let existing = t.node(&requester)?.unwrap_or_default();
    let license = if existing.has_license() {
        existing.license
    } else {
        t.assign_license(&requester)?
    };
    let balance = existing
        .balance
        .add(t.config.admin_initial_balance)
        .ok_or(Rejection::ArithmeticOverflow)?;
    let staked_balance = existing
        .staked_balance
        .add(t.config.admin_initial_stake)
        .ok_or(Rejection::ArithmeticOverflow)?;

    let node = NodeRecord {
        role: RoleMask::INDEXER,
        writing_key,
        balance,
        license,
        staked_balance,
    };
    t.put_node(&requester, &node);
    t.bind_writer_key(&writing_key, &requester)?;

    let admin = AdminRecord {
        address: requester.clone(),
        writing_key,
    };
    let scope = t.scope_mut();
    scope.put(keys::ADMIN, admin.encode());
    scope.put(keys::INITIALIZATION, vec![INITIALIZATION_ENABLED]);

    info!(admin = %requester, license, "admin registered");
    Ok(())
}

/// Close the initialization phase for good
pub(crate) fn disable_initialization(
    t: &mut Transition<'_>,
    writing_key: &WriterKey,
) -> Result<(), ApplyError> {
    let admin = t.require_admin()?;
    if *writing_key != admin.writing_key {
        return Err(Rejection::WritingKeyMismatch.into());
    }
    if !t.initialization_enabled() {
        return Err(Rejection::InitializationDisabled.into());
    }

    t.scope_mut()
        .put(keys::INITIALIZATION, vec![INITIALIZATION_DISABLED]);
    t.settle(&admin.address, FeePolicy::AdminWaivable, None)?;

    info!("initialization disabled");
    Ok(())
}

/// Credit `amount` to `target` during initialization
pub(crate) fn balance_initialization(
    t: &mut Transition<'_>,
    target: &Address,
    amount: Balance,
) -> Result<(), ApplyError> {
    let admin = t.require_admin()?;
    if !t.initialization_enabled() {
        return Err(Rejection::InitializationDisabled.into());
    }

    let mut node = t.node(target)?.unwrap_or_default();
    node.balance = node.balance.add(amount).ok_or(Rejection::ArithmeticOverflow)?;
    t.put_node(target, &node);
    t.settle(&admin.address, FeePolicy::AdminWaivable, None)
}
