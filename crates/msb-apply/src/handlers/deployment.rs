//! External bootstrap deployment

use tracing::info;

use msb_core::{keys, DeploymentRecord, WriterKey};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

/// Bind external bootstrap `bootstrap` to the requester
pub(crate) fn bootstrap_deployment(
    t: &mut Transition<'_>,
    bootstrap: WriterKey,
) -> Result<(), ApplyError> {
    if bootstrap == t.context.bootstrap {
        return Err(Rejection::ReservedBootstrap.into());
    }
    if t.reader().deployment(&bootstrap)?.is_some() {
        return Err(Rejection::DeploymentExists.into());
    }
    let requester = t.op.requester.clone();
    let node = t.existing_node(&requester, Rejection::InsufficientBalance)?;
    if node.balance < t.fee_for(&requester, FeePolicy::AdminWaivable)? {
        return Err(Rejection::InsufficientBalance.into());
    }

    let validator = t.validator()?;

    let record = DeploymentRecord {
        requester: requester.clone(),
        tx: t.op.tx,
    };
    t.scope_mut().put(keys::deployment(&bootstrap), record.encode());
    t.settle(&requester, FeePolicy::AdminWaivable, Some(&validator))?;

    info!(requester = %requester, bootstrap = %bootstrap, "bootstrap deployed");
    Ok(())
}
