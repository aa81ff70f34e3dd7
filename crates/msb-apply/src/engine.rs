//! The apply engine
//!
//! Consumes a linearized batch of delivered operations and folds each one
//! into a [`ViewBatch`]. Every operation runs in its own
//! [`OperationScope`](crate::view::OperationScope): it either passes every
//! check and is merged whole, or it is skipped and leaves nothing behind.
//! Failures never cross an operation boundary.

use tracing::{debug, info, trace, warn};

use msb_core::crypto::verify;
use msb_core::{keys, ErrorCode, Hash32};
use msb_ops::{validate, Operation, OperationKind, RawOperation};

use crate::config::{ConfigError, LedgerConfig};
use crate::context::{ApplyContext, DeliveredOperation};
use crate::error::{ApplyError, Rejection};
use crate::handlers::{self, Transition};
use crate::membership::{MembershipChange, MembershipDiff, MembershipSet};
use crate::view::{ReadView, ViewBatch, WriteSet};

/// Result of one delivered operation
#[derive(Debug)]
pub struct OperationOutcome {
    /// Position in the delivered batch
    pub index: usize,
    /// Kind, once the operation passed schema validation
    pub kind: Option<OperationKind>,
    /// Operation hash, once the operation passed schema validation
    pub tx: Option<Hash32>,
    /// `Ok` when the operation was applied
    pub result: Result<(), ApplyError>,
}

impl OperationOutcome {
    /// Whether the operation's effects were merged
    pub fn is_applied(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything one apply call produced besides the batch writes
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// One outcome per delivered operation, in order
    pub outcomes: Vec<OperationOutcome>,
    /// Membership changes the host must commit together with the batch
    pub membership: MembershipDiff,
}

impl ApplyReport {
    /// Number of applied operations
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Outcomes of skipped operations
    pub fn skipped(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| !o.is_applied())
    }
}

/// Deterministic state-transition engine
#[derive(Debug, Clone, Default)]
pub struct ApplyEngine {
    config: LedgerConfig,
}

impl ApplyEngine {
    /// Engine running under `config`
    pub fn new(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Apply `operations` in order on top of `batch`.
    ///
    /// The batch only ever receives writes of fully applied operations. The
    /// caller commits it and applies [`ApplyReport::membership`] in one step.
    pub fn apply<S: ReadView + ?Sized>(
        &self,
        operations: &[DeliveredOperation],
        batch: &mut ViewBatch<'_, S>,
        context: &ApplyContext,
    ) -> ApplyReport {
        let mut membership = context.membership.clone();
        let mut report = ApplyReport::default();

        for (index, delivered) in operations.iter().enumerate() {
            let op = match decode(delivered) {
                Ok(op) => op,
                Err(error) => {
                    match &error {
                        ApplyError::Decode(_) => {
                            debug!(index, code = error.code(), %error, "skipping undecodable operation");
                        }
                        _ => {
                            warn!(index, code = error.code(), %error, "skipping malformed operation");
                        }
                    }
                    report.outcomes.push(OperationOutcome {
                        index,
                        kind: None,
                        tx: None,
                        result: Err(error),
                    });
                    continue;
                }
            };

            let result = self.transition(&op, delivered, &*batch, &membership, context);
            let result = match result {
                Ok((writes, changes)) => {
                    batch.merge(writes);
                    for change in changes {
                        membership.apply(&change);
                        report.membership.push(change);
                    }
                    debug!(index, kind = %op.kind, tx = %op.tx, "operation applied");
                    Ok(())
                }
                Err(ApplyError::Replay(tx)) => {
                    trace!(index, tx = %tx, "skipping replayed operation");
                    Err(ApplyError::Replay(tx))
                }
                Err(error) => {
                    warn!(
                        index,
                        kind = %op.kind,
                        tx = %op.tx,
                        code = error.code(),
                        reason = %error,
                        "operation rejected"
                    );
                    Err(error)
                }
            };
            report.outcomes.push(OperationOutcome {
                index,
                kind: Some(op.kind),
                tx: Some(op.tx),
                result,
            });
        }

        info!(
            delivered = operations.len(),
            applied = report.applied(),
            membership_changes = report.membership.changes().len(),
            "batch applied"
        );
        report
    }

    fn transition(
        &self,
        op: &Operation,
        delivered: &DeliveredOperation,
        base: &dyn ReadView,
        membership: &MembershipSet,
        context: &ApplyContext,
    ) -> Result<(WriteSet, Vec<MembershipChange>), ApplyError> {
        authenticate(op)?;

        let mut t = Transition::new(op, delivered.from, context, &self.config, membership, base)?;
        if t.reader().is_applied(&op.tx)? {
            return Err(ApplyError::Replay(op.tx));
        }
        if op.tx_validity != context.tx_validity {
            return Err(Rejection::StaleTxValidity.into());
        }

        handlers::dispatch(&mut t)?;

        t.scope_mut()
            .put(keys::replay(&op.tx), delivered.value.clone());
        Ok(t.finish())
    }
}

fn decode(delivered: &DeliveredOperation) -> Result<Operation, ApplyError> {
    let raw = RawOperation::decode(&delivered.value)?;
    Ok(validate(&raw)?)
}

/// Bind the operation to its requester: the claimed hash must be the
/// canonical one and the requester must have signed it.
fn authenticate(op: &Operation) -> Result<(), Rejection> {
    let key = op
        .requester
        .public_key()
        .map_err(|_| Rejection::InvalidRequesterKey)?;
    if op.compute_hash() != op.tx {
        return Err(Rejection::HashMismatch);
    }
    if !verify(&key, op.tx.as_bytes(), &op.signature) {
        return Err(Rejection::InvalidSignature);
    }
    Ok(())
}
