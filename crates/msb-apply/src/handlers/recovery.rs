//! Admin key recovery
//!
//! Rotates the admin onto a fresh writing key after the old one was lost.
//! Because the admin can no longer append, an independent writer must
//! cosign and deliver the operation.

use tracing::info;

use msb_core::{keys, WriterKey};

use super::{FeePolicy, Transition};
use crate::error::{ApplyError, Rejection};

pub(crate) fn admin_recovery(t: &mut Transition<'_>, writing_key: WriterKey) -> Result<(), ApplyError> {
    let admin = t.reader().admin()?.ok_or(Rejection::NoAdmin)?;
    if t.op.requester != admin.address {
        return Err(Rejection::NotAdmin.into());
    }
    if t.reader().writer_owner(&writing_key)?.is_some() {
        return Err(Rejection::WriterKeyInUse.into());
    }
    if !t.is_member(&admin.writing_key) {
        return Err(Rejection::AdminKeyNotMember.into());
    }

    let validator = t.validator()?;
    if validator == admin.address {
        return Err(Rejection::ValidatorIsRequester.into());
    }

    let node = t.existing_node(&admin.address, Rejection::NoAdmin)?;
    t.put_node(&admin.address, &node.with_writing_key(writing_key));
    t.rebind_writer_key(&writing_key, &admin.address);
    t.scope_mut()
        .put(keys::ADMIN, admin.with_writing_key(writing_key).encode());
    // new key joins first so the old one is never the last member
    t.add_member(writing_key)?;
    t.remove_member(admin.writing_key)?;
    t.settle(&admin.address, FeePolicy::AdminWaivable, Some(&validator))?;

    info!(
        admin = %admin.address,
        old_key = %admin.writing_key,
        new_key = %writing_key,
        "admin key recovered"
    );
    Ok(())
}
