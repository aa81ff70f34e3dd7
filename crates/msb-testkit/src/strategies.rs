//! Property test strategies

use proptest::prelude::*;

use msb_core::Balance;

pub use proptest;

/// Amount between zero and `max_tokens` whole tokens, in thousandths
pub fn arb_amount(max_tokens: u64) -> impl Strategy<Value = Balance> {
    (0..=max_tokens * 1_000).prop_map(|milli| {
        Balance::from_raw(u128::from(milli) * 1_000_000_000_000_000)
    })
}

/// One transfer between two of `participants` participants
#[derive(Debug, Clone)]
pub struct TransferStep {
    /// Index of the sender
    pub sender: usize,
    /// Index of the recipient
    pub recipient: usize,
    /// Amount moved
    pub amount: Balance,
}

/// Sequence of up to `max_len` transfers among `participants` participants
pub fn arb_transfer_steps(participants: usize, max_len: usize) -> impl Strategy<Value = Vec<TransferStep>> {
    prop::collection::vec(
        (0..participants, 0..participants, arb_amount(40)).prop_map(|(sender, recipient, amount)| {
            TransferStep {
                sender,
                recipient,
                amount,
            }
        }),
        0..=max_len,
    )
}
