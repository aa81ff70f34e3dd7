//! # MSB Ops - operations and their schema
//!
//! Everything between raw log bytes and a typed operation the apply engine
//! can act on:
//!
//! - **kind**: type discriminants, payload families and field sets
//! - **wire**: the `bincode` wire format with all-optional payload fields
//! - **schema**: structural validation producing a typed [`Operation`]
//! - **message**: canonical requester and validator signing messages
//! - **assembly**: client-side building, signing and cosigning
//!
//! Validation here is purely structural. Authenticity and state preconditions
//! are checked by the engine in `msb-apply`.

#![forbid(unsafe_code)]

pub mod assembly;
pub mod kind;
pub mod message;
pub mod operation;
pub mod schema;
pub mod wire;

pub use assembly::{cosign, AssemblyError, OperationBuilder};
pub use kind::{Field, OperationKind, PayloadFamily};
pub use operation::{Cosignature, Operation, OperationBody};
pub use schema::{is_valid, validate, SchemaError};
pub use wire::{DecodeError, PayloadFields, RawOperation, RawPayload};
