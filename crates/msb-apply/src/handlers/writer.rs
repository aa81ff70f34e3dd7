//! Writer registration and release

use tracing::debug;

use msb_core::{RoleMask, WriterKey};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

/// Promote the requester to writer under `writing_key`, locking the stake
pub(crate) fn add_writer(t: &mut Transition<'_>, writing_key: WriterKey) -> Result<(), ApplyError> {
    let requester = t.op.requester.clone();
    let node = t.existing_node(&requester, Rejection::NotWhitelisted)?;
    if !node.is_whitelisted() {
        return Err(Rejection::NotWhitelisted.into());
    }
    if node.is_writer() {
        return Err(Rejection::AlreadyWriter.into());
    }
    t.ensure_key_available(&writing_key, &requester)?;

    let stake = t.config.writer_stake;
    let fee = t.fee_for(&requester, FeePolicy::AdminWaivable)?;
    let required = stake.add(fee).ok_or(Rejection::ArithmeticOverflow)?;
    if node.balance < required {
        return Err(Rejection::InsufficientBalance.into());
    }

    let validator = t.validator()?;

    let balance = node.balance.sub(stake).ok_or(Rejection::InsufficientBalance)?;
    let staked_balance = node
        .staked_balance
        .add(stake)
        .ok_or(Rejection::ArithmeticOverflow)?;
    let updated = node
        .with_role(RoleMask::WRITER)
        .with_writing_key(writing_key)
        .with_balance(balance)
        .with_staked_balance(staked_balance);
    t.put_node(&requester, &updated);
    t.bind_writer_key(&writing_key, &requester)?;
    t.settle(&requester, FeePolicy::AdminWaivable, Some(&validator))?;

    debug!(writer = %requester, key = %writing_key, "writer added");
    Ok(())
}

/// Demote the requester to whitelisted and release its stake
pub(crate) fn remove_writer(t: &mut Transition<'_>, writing_key: &WriterKey) -> Result<(), ApplyError> {
    let requester = t.op.requester.clone();
    if t.is_admin(&requester)? {
        return Err(Rejection::TargetIsAdmin.into());
    }
    let node = t.existing_node(&requester, Rejection::NotWriter)?;
    if !node.is_writer() {
        return Err(Rejection::NotWriter.into());
    }
    if *writing_key != node.writing_key {
        return Err(Rejection::WritingKeyMismatch.into());
    }

    let validator = t.validator()?;

    if node.is_indexer() {
        t.remove_member(node.writing_key)?;
    }
    let balance = node
        .balance
        .add(node.staked_balance)
        .ok_or(Rejection::ArithmeticOverflow)?;
    let updated = node
        .with_role(RoleMask::WHITELISTED)
        .with_balance(balance)
        .with_staked_balance(msb_core::Balance::ZERO);
    t.put_node(&requester, &updated);
    t.settle(&requester, FeePolicy::AdminWaivable, Some(&validator))?;

    debug!(writer = %requester, key = %writing_key, "writer removed");
    Ok(())
}
