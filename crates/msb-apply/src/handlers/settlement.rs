//! Fee settlement
//!
//! The payer is debited the flat fee. A share of it goes to the validator
//! that cosigned the operation unless the validator is the payer; the rest
//! is burned.

use tracing::debug;

use msb_core::{Address, Balance};

use super::Transition;
use crate::error::{ApplyError, Rejection};

/// Whether an operation pays the flat fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeePolicy {
    /// Waived for the admin while initialization is enabled
    AdminWaivable,
    /// Always charged, the admin included
    Charged,
}

impl Transition<'_> {
    /// Fee `payer` owes under `policy`
    pub(crate) fn fee_for(&self, payer: &Address, policy: FeePolicy) -> Result<Balance, ApplyError> {
        Ok(match policy {
            FeePolicy::AdminWaivable if self.initialization_enabled() && self.is_admin(payer)? => {
                Balance::ZERO
            }
            FeePolicy::AdminWaivable | FeePolicy::Charged => self.config.fee,
        })
    }

    /// Debit the fee from `payer` and reward `validator`
    pub(crate) fn settle(
        &mut self,
        payer: &Address,
        policy: FeePolicy,
        validator: Option<&Address>,
    ) -> Result<(), ApplyError> {
        let fee = self.fee_for(payer, policy)?;
        if fee.is_zero() {
            return Ok(());
        }

        let mut node = self.existing_node(payer, Rejection::InsufficientBalance)?;
        node.balance = node.balance.sub(fee).ok_or(Rejection::InsufficientBalance)?;
        self.put_node(payer, &node);

        let mut reward = Balance::ZERO;
        if let Some(validator) = validator.filter(|validator| *validator != payer) {
            reward = fee
                .percentage(self.config.reward_factor())
                .ok_or(Rejection::ArithmeticOverflow)?;
            let mut record = self.existing_node(validator, Rejection::ValidatorNotWriter)?;
            record.balance = record.balance.add(reward).ok_or(Rejection::ArithmeticOverflow)?;
            self.put_node(validator, &record);
        }

        debug!(
            payer = %payer,
            fee = %fee,
            reward = %reward,
            "settled operation fee"
        );
        Ok(())
    }
}
