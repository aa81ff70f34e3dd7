//! Fixed-layout record codecs
//!
//! Every decoder validates the exact layout width and returns a
//! [`CodecError`](crate::CodecError) on any structural mismatch. Mutators
//! never touch ambient state: they return a freshly encoded record.

pub mod admin;
pub mod counter;
pub mod deployment;
pub mod node;

pub use admin::{AdminRecord, ADMIN_RECORD_LENGTH};
pub use deployment::{DeploymentRecord, DEPLOYMENT_RECORD_LENGTH};
pub use node::{NodeRecord, RoleMask, NODE_RECORD_LENGTH, NO_LICENSE};

/// Initialization flag value while balance initialization is allowed
pub const INITIALIZATION_ENABLED: u8 = 1;

/// Initialization flag value once disabled
pub const INITIALIZATION_DISABLED: u8 = 0;
