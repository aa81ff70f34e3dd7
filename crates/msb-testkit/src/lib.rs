//! MSB testing infrastructure
//!
//! Deterministic fixtures shared by the integration suites: participant keys
//! derived from seed strings, seeded nonces, factories that build signed and
//! cosigned wire operations, and an in-memory replica that commits batches
//! the way a host would.
//!
//! ```toml
//! [dev-dependencies]
//! msb-testkit = { path = "../msb-testkit" }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod factories;
pub mod keys;
pub mod replica;
pub mod strategies;

pub use factories::{deliver, NonceSource, OperationFactory};
pub use keys::{writer_key_from_seed, Participant};
pub use replica::Replica;

use msb_core::{Balance, Hash32};

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Membership digest used by test replicas
pub fn test_tx_validity() -> Hash32 {
    msb_core::crypto::hash(b"msb-testkit/membership/0")
}

/// Whole-token amount
pub fn tokens(amount: u64) -> Balance {
    Balance::from_tokens(amount).expect("test amount fits")
}

/// Decimal amount such as `"0.03"`
pub fn amount(text: &str) -> Balance {
    Balance::parse_decimal(text).expect("valid test amount")
}
