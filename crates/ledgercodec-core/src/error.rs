//! Error types for the LedgerCodec decode pipeline.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while decoding a single CBOR structure.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("CBOR decode failed: {0}")]
    Cbor(#[from] minicbor::decode::Error),

    #[error("{record}: expected at least {expected} elements, got {actual}")]
    TooFewElements {
        record: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unexpected CBOR item: expected {expected}, found {found}")]
    UnexpectedType { expected: String, found: String },

    #[error("{record}.{field}: {source}")]
    InField {
        record: String,
        field: String,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("Schema mismatch in {record}: key {key} is not a {expected}")]
    SchemaMismatch {
        record: String,
        key: u64,
        expected: String,
    },

    #[error("Integer {value} out of range for {target}")]
    IntegerOutOfRange { value: u64, target: &'static str },

    #[error("Invalid hash length: expected {expected} bytes, got {actual}")]
    HashLength { expected: usize, actual: usize },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Inconsistent block: {reason}")]
    Inconsistent { reason: String },

    #[error("Nesting deeper than {max} levels")]
    TooDeep { max: usize },
}

impl DecodeError {
    /// Wrap this error with the record and field it was raised from.
    pub fn in_field(self, record: &str, field: &str) -> Self {
        DecodeError::InField {
            record: record.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all field context stripped.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failure to isolate a header's raw byte span from its block envelope.
#[derive(Debug, Error)]
pub enum HashDerivationError {
    #[error("Block envelope could not be re-parsed: {0}")]
    Envelope(#[from] minicbor::decode::Error),

    #[error("Block envelope is not a CBOR array")]
    NotAnArray,

    #[error("Block envelope has no header element")]
    EmptyEnvelope,
}

/// Structural defects in a composed record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{record}: key {key} defined twice")]
    DuplicateKey { record: String, key: u64 },

    #[error("{record}: cannot loosen key {key}, the base schema does not define it")]
    UnknownKey { record: String, key: u64 },

    #[error("{record}: array positions must be contiguous from 0, found {key} at index {index}")]
    NonContiguous {
        record: String,
        key: u64,
        index: usize,
    },

    #[error("{record}: required field at position {key} follows an optional one")]
    RequiredAfterOptional { record: String, key: u64 },
}

/// The numeric tag spaces used to route dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSpace {
    BlockType,
    BlockHeaderType,
    TransactionType,
}

impl fmt::Display for TagSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSpace::BlockType => write!(f, "block type"),
            TagSpace::BlockHeaderType => write!(f, "block header type"),
            TagSpace::TransactionType => write!(f, "transaction type"),
        }
    }
}

/// Top-level error returned by the dispatch facade.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unknown {space} tag {tag}")]
    UnknownTypeTag { space: TagSpace, tag: u64 },

    #[error("Header hash derivation failed: {0}")]
    HashDerivation(#[from] HashDerivationError),
}

/// Errors that can occur during batch decoding.
#[derive(Debug, Error)]
pub enum BatchDecodeError {
    #[error("Batch aborted after {count} errors")]
    TooManyErrors { count: usize },

    #[error("Decode error at index {index}: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: LedgerError,
    },

    #[error("{0}")]
    Other(String),
}
