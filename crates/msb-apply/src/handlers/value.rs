//! Transfers and subnetwork transactions

use tracing::debug;

use msb_core::{Address, Balance, WriterKey};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

/// Move `amount` from the requester to `recipient`
pub(crate) fn transfer(
    t: &mut Transition<'_>,
    recipient: &Address,
    amount: Balance,
) -> Result<(), ApplyError> {
    let sender = t.op.requester.clone();
    let node = t.existing_node(&sender, Rejection::InsufficientBalance)?;
    let fee = t.fee_for(&sender, FeePolicy::AdminWaivable)?;
    let required = amount.add(fee).ok_or(Rejection::ArithmeticOverflow)?;
    if node.balance < required {
        return Err(Rejection::InsufficientBalance.into());
    }

    let validator = t.validator()?;

    let debited = node.balance.sub(amount).ok_or(Rejection::InsufficientBalance)?;
    t.put_node(&sender, &node.with_balance(debited));

    let credited = t.node(recipient)?.unwrap_or_default();
    let balance = credited
        .balance
        .add(amount)
        .ok_or(Rejection::ArithmeticOverflow)?;
    t.put_node(recipient, &credited.with_balance(balance));

    t.settle(&sender, FeePolicy::AdminWaivable, Some(&validator))?;

    debug!(from = %sender, to = %recipient, amount = %amount, "transfer applied");
    Ok(())
}

/// Settle a subnetwork transaction against this ledger
pub(crate) fn transaction(
    t: &mut Transition<'_>,
    external_bootstrap: &WriterKey,
    msb_bootstrap: &WriterKey,
) -> Result<(), ApplyError> {
    if *msb_bootstrap != t.context.bootstrap {
        return Err(Rejection::BootstrapMismatch.into());
    }
    if t.reader().deployment(external_bootstrap)?.is_none() {
        return Err(Rejection::UnknownDeployment.into());
    }
    let requester = t.op.requester.clone();
    let node = t.existing_node(&requester, Rejection::InsufficientBalance)?;
    if node.balance < t.fee_for(&requester, FeePolicy::AdminWaivable)? {
        return Err(Rejection::InsufficientBalance.into());
    }

    let validator = t.validator()?;
    t.settle(&requester, FeePolicy::AdminWaivable, Some(&validator))?;

    debug!(requester = %requester, bootstrap = %external_bootstrap, "transaction applied");
    Ok(())
}
