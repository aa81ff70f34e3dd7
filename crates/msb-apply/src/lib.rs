//! # MSB Apply - the ledger state-transition engine
//!
//! Given a linearized batch of delivered operations, a transactional view and
//! the current validator set, the engine decides for each operation whether
//! it is applied and what it writes:
//!
//! - **view**: key-value layers with a single commit point per operation
//! - **reader**: typed reads of ledger records
//! - **membership**: the validator set and the diff the engine reports
//! - **engine**: the per-operation pipeline from bytes to committed effects
//! - **config**: fee, stake and reward parameters
//!
//! Every replica running the same engine over the same input produces
//! byte-identical views and identical membership diffs.

#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
mod handlers;
pub mod membership;
pub mod reader;
pub mod view;

pub use config::{ConfigError, LedgerConfig};
pub use context::{ApplyContext, DeliveredOperation};
pub use engine::{ApplyEngine, ApplyReport, OperationOutcome};
pub use error::{ApplyError, Rejection};
pub use membership::{MembershipChange, MembershipDiff, MembershipEntry, MembershipSet};
pub use reader::LedgerReader;
pub use view::{KvStore, MemoryStore, OperationScope, ReadView, StoreError, ViewBatch, ViewError, WriteSet};
