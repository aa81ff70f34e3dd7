//! Per-kind state transitions
//!
//! Each handler checks its kind's preconditions, verifies the validator
//! cosignature where the kind needs one, stages its effects and settles the
//! fee, all against a [`Transition`]. Nothing a handler stages is visible
//! outside the transition until the engine merges it.

mod access;
mod admin;
mod deployment;
mod indexer;
mod recovery;
mod registry;
mod settlement;
mod value;
mod writer;

use msb_core::crypto::verify;
use msb_core::{Address, AdminRecord, NodeRecord, WriterKey};
use msb_ops::{message, Operation, OperationBody, OperationKind};

use crate::config::LedgerConfig;
use crate::context::ApplyContext;
use crate::error::{ApplyError, Rejection};
use crate::membership::{MembershipChange, MembershipSet};
use crate::reader::LedgerReader;
use crate::view::{OperationScope, ReadView, WriteSet};

pub(crate) use settlement::FeePolicy;

/// Staging area and inputs of one operation
pub(crate) struct Transition<'a> {
    pub(crate) op: &'a Operation,
    /// Writer key of the log the operation was delivered on
    pub(crate) from: WriterKey,
    pub(crate) context: &'a ApplyContext,
    pub(crate) config: &'a LedgerConfig,
    membership: &'a MembershipSet,
    scope: OperationScope<'a>,
    changes: Vec<MembershipChange>,
    /// Flag as it stood before this operation
    initialization_enabled: bool,
}

impl<'a> Transition<'a> {
    pub(crate) fn new(
        op: &'a Operation,
        from: WriterKey,
        context: &'a ApplyContext,
        config: &'a LedgerConfig,
        membership: &'a MembershipSet,
        base: &'a dyn ReadView,
    ) -> Result<Self, ApplyError> {
        let scope = OperationScope::new(base);
        let initialization_enabled = LedgerReader::new(&scope).initialization_enabled()?;
        Ok(Self {
            op,
            from,
            context,
            config,
            membership,
            scope,
            changes: Vec::new(),
            initialization_enabled,
        })
    }

    pub(crate) fn reader(&self) -> LedgerReader<'_, OperationScope<'a>> {
        LedgerReader::new(&self.scope)
    }

    pub(crate) fn scope_mut(&mut self) -> &mut OperationScope<'a> {
        &mut self.scope
    }

    pub(crate) fn initialization_enabled(&self) -> bool {
        self.initialization_enabled
    }

    pub(crate) fn node(&self, address: &Address) -> Result<Option<NodeRecord>, ApplyError> {
        Ok(self.reader().node(address)?)
    }

    /// Node record of `address`, or `missing` when there is none
    pub(crate) fn existing_node(
        &self,
        address: &Address,
        missing: Rejection,
    ) -> Result<NodeRecord, ApplyError> {
        self.node(address)?.ok_or_else(|| missing.into())
    }

    pub(crate) fn put_node(&mut self, address: &Address, record: &NodeRecord) {
        self.scope.put(msb_core::keys::node(address), record.encode().to_vec());
    }

    /// Admin record, provided the requester and the appending writer are the admin
    pub(crate) fn require_admin(&self) -> Result<AdminRecord, ApplyError> {
        let admin = self.reader().admin()?.ok_or(Rejection::NoAdmin)?;
        if self.op.requester != admin.address || self.from != admin.writing_key {
            return Err(Rejection::NotAdmin.into());
        }
        Ok(admin)
    }

    /// Whether `address` is the registered admin
    pub(crate) fn is_admin(&self, address: &Address) -> Result<bool, ApplyError> {
        Ok(self
            .reader()
            .admin()?
            .is_some_and(|admin| admin.address == *address))
    }

    /// Verify the cosignature and the validator's standing, returning its address.
    ///
    /// An eligible validator is a writer whose writing key is the log the
    /// operation arrived on, and which the writer registry binds to it.
    pub(crate) fn validator(&self) -> Result<Address, ApplyError> {
        let cosign = self.op.cosign.as_ref().ok_or(Rejection::MissingCosignature)?;
        let key = cosign
            .validator
            .public_key()
            .map_err(|_| Rejection::InvalidValidatorKey)?;
        let digest = message::validator_hash(&self.op.tx, &cosign.validator, &cosign.nonce);
        if !verify(&key, digest.as_bytes(), &cosign.signature) {
            return Err(Rejection::InvalidValidatorSignature.into());
        }

        let node = self
            .node(&cosign.validator)?
            .filter(NodeRecord::is_writer)
            .ok_or(Rejection::ValidatorNotWriter)?;
        if node.writing_key != self.from {
            return Err(Rejection::ValidatorKeyMismatch.into());
        }
        if self.reader().writer_owner(&self.from)?.as_ref() != Some(&cosign.validator) {
            return Err(Rejection::ValidatorKeyMismatch.into());
        }
        Ok(cosign.validator.clone())
    }

    /// Membership as it stands with this operation's pending changes
    pub(crate) fn is_member(&self, key: &WriterKey) -> bool {
        match self.changes.iter().rev().find(|change| change.key() == key) {
            Some(MembershipChange::Add(_)) => true,
            Some(MembershipChange::Remove(_)) => false,
            None => self.membership.contains(key),
        }
    }

    fn member_count(&self) -> usize {
        let mut members = self.membership.clone();
        for change in &self.changes {
            members.apply(change);
        }
        members.len()
    }

    pub(crate) fn add_member(&mut self, key: WriterKey) -> Result<(), Rejection> {
        if self.is_member(&key) {
            return Err(Rejection::MembershipConflict);
        }
        self.changes.push(MembershipChange::Add(key));
        Ok(())
    }

    /// Remove `key` if it is a member; never empties the set
    pub(crate) fn remove_member(&mut self, key: WriterKey) -> Result<(), Rejection> {
        if !self.is_member(&key) {
            return Ok(());
        }
        if self.member_count() <= 1 {
            return Err(Rejection::LastIndexer);
        }
        self.changes.push(MembershipChange::Remove(key));
        Ok(())
    }

    /// Staged writes and membership changes, consumed at the commit point
    pub(crate) fn finish(self) -> (WriteSet, Vec<MembershipChange>) {
        (self.scope.into_writes(), self.changes)
    }
}

/// Run the handler of the operation's kind
pub(crate) fn dispatch(t: &mut Transition<'_>) -> Result<(), ApplyError> {
    let op = t.op;
    match (op.kind, &op.body) {
        (OperationKind::AddAdmin, OperationBody::CoreAdmin { writing_key }) => {
            admin::add_admin(t, *writing_key)
        }
        (OperationKind::DisableInitialization, OperationBody::CoreAdmin { writing_key }) => {
            admin::disable_initialization(t, writing_key)
        }
        (
            OperationKind::BalanceInitialization,
            OperationBody::BalanceInitialization { target, amount },
        ) => admin::balance_initialization(t, target, *amount),
        (OperationKind::AppendWhitelist, OperationBody::AdminControl { target }) => {
            access::append_whitelist(t, target)
        }
        (OperationKind::BanValidator, OperationBody::AdminControl { target }) => {
            access::ban_validator(t, target)
        }
        (OperationKind::AddWriter, OperationBody::RoleAccess { writing_key }) => {
            writer::add_writer(t, *writing_key)
        }
        (OperationKind::RemoveWriter, OperationBody::RoleAccess { writing_key }) => {
            writer::remove_writer(t, writing_key)
        }
        (OperationKind::AddIndexer, OperationBody::AdminControl { target }) => {
            indexer::add_indexer(t, target)
        }
        (OperationKind::RemoveIndexer, OperationBody::AdminControl { target }) => {
            indexer::remove_indexer(t, target)
        }
        (OperationKind::AdminRecovery, OperationBody::RoleAccess { writing_key }) => {
            recovery::admin_recovery(t, *writing_key)
        }
        (OperationKind::Transfer, OperationBody::Transfer { recipient, amount }) => {
            value::transfer(t, recipient, *amount)
        }
        (
            OperationKind::Transaction,
            OperationBody::Transaction {
                external_bootstrap,
                msb_bootstrap,
                ..
            },
        ) => value::transaction(t, external_bootstrap, msb_bootstrap),
        (OperationKind::BootstrapDeployment, OperationBody::BootstrapDeployment { bootstrap, .. }) => {
            deployment::bootstrap_deployment(t, *bootstrap)
        }
        _ => Err(Rejection::BodyMismatch.into()),
    }
}
