//! Error types for record codecs and identities

use thiserror::Error;

/// Stable machine-readable code attached to every ledger error.
///
/// The code is used as the `code` field of structured log events so that
/// rejections can be grouped without parsing messages.
pub trait ErrorCode {
    /// Short snake_case identifier for this error
    fn code(&self) -> &'static str;
}

/// Structural mismatch while decoding or patching a fixed-layout record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Buffer length does not match the record layout
    #[error("{record}: expected {expected} bytes, got {actual}")]
    Length {
        /// Record or field being decoded
        record: &'static str,
        /// Layout width
        expected: usize,
        /// Width that was supplied
        actual: usize,
    },

    /// A sub-field holds a value outside its domain
    #[error("{record}: invalid {field}")]
    Domain {
        /// Record being decoded
        record: &'static str,
        /// Offending field
        field: &'static str,
    },
}

impl CodecError {
    /// Create a length mismatch error
    pub fn length(record: &'static str, expected: usize, actual: usize) -> Self {
        Self::Length {
            record,
            expected,
            actual,
        }
    }

    /// Create a domain error
    pub fn domain(record: &'static str, field: &'static str) -> Self {
        Self::Domain { record, field }
    }
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            CodecError::Length { .. } => "codec_length",
            CodecError::Domain { .. } => "codec_domain",
        }
    }
}

/// Failure to interpret an address
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Wrong number of bytes
    #[error("address must be {expected} bytes, got {actual}")]
    Length {
        /// Required width
        expected: usize,
        /// Supplied width
        actual: usize,
    },

    /// Missing or wrong human-readable prefix
    #[error("address prefix mismatch")]
    Prefix,

    /// Key part is not lowercase hex
    #[error("address key is not lowercase hex")]
    Encoding,

    /// Key part does not decode to a curve point
    #[error("address key is not a valid ed25519 public key")]
    PublicKey,
}

impl ErrorCode for AddressError {
    fn code(&self) -> &'static str {
        match self {
            AddressError::Length { .. } => "address_length",
            AddressError::Prefix => "address_prefix",
            AddressError::Encoding => "address_encoding",
            AddressError::PublicKey => "address_public_key",
        }
    }
}

/// Result alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
