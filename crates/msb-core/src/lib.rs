//! # MSB Core - ledger foundation
//!
//! Pure building blocks shared by every replica of the settlement ledger:
//!
//! - **balance**: fixed-precision 16-byte amounts with sentinel-on-invalid arithmetic
//! - **address**: canonical participant addresses derived from ed25519 keys
//! - **crypto**: the single hash algorithm and signature verification
//! - **records**: fixed-layout codecs for node, admin and deployment records and counters
//! - **keys**: the view key-space
//!
//! Nothing here performs I/O.

#![forbid(unsafe_code)]

pub mod address;
pub mod balance;
pub mod crypto;
pub mod errors;
pub mod keys;
pub mod records;
pub mod types;

pub use address::{Address, ADDRESS_BYTE_LENGTH};
pub use balance::{Balance, BALANCE_BYTE_LENGTH, DECIMALS, PERCENT_SCALE};
pub use errors::{AddressError, CodecError, CodecResult, ErrorCode};
pub use records::{AdminRecord, DeploymentRecord, NodeRecord, RoleMask};
pub use types::{Hash32, Nonce, SignatureBytes, WriterKey, KEY_BYTE_LENGTH, SIGNATURE_BYTE_LENGTH};
