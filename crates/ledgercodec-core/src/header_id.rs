//! Block-header identifiers.
//!
//! The identifier is BLAKE2b-256 over `prefix || header_bytes`, where
//! `header_bytes` is the exact span of the header inside the original
//! block encoding (element 0 of the block's outer array), never a
//! re-encoding. Byron headers are hashed behind a synthetic two-byte
//! prefix: a 2-element array marker followed by the Byron sub-kind tag.

use bytes::Bytes;
use minicbor::data::Type;
use minicbor::Decoder;
use once_cell::sync::OnceCell;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::era::BlockType;
use crate::error::HashDerivationError;
use crate::hash::{blake2b_256, Blake2b256};

/// Synthetic bytes prepended to a header before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderPrefix {
    None,
    ByronEpochBoundary,
    ByronMain,
}

impl HeaderPrefix {
    pub fn for_block_type(block_type: BlockType) -> Self {
        match block_type {
            BlockType::ByronEpochBoundary => HeaderPrefix::ByronEpochBoundary,
            BlockType::ByronMain => HeaderPrefix::ByronMain,
            _ => HeaderPrefix::None,
        }
    }

    pub fn bytes(self) -> &'static [u8] {
        match self {
            HeaderPrefix::None => &[],
            HeaderPrefix::ByronEpochBoundary => &[0x82, 0x00],
            HeaderPrefix::ByronMain => &[0x82, 0x01],
        }
    }
}

pub fn derive_header_id(prefix: HeaderPrefix, header_bytes: &[u8]) -> Blake2b256 {
    blake2b_256(&[prefix.bytes(), header_bytes])
}

/// Re-parse a block envelope and return the raw span of its header.
pub fn extract_header_span(block_bytes: &[u8]) -> Result<&[u8], HashDerivationError> {
    let mut d = Decoder::new(block_bytes);
    let len = match d.datatype()? {
        Type::Array | Type::ArrayIndef => d.array()?,
        _ => return Err(HashDerivationError::NotAnArray),
    };
    match len {
        Some(0) => return Err(HashDerivationError::EmptyEnvelope),
        None if d.datatype()? == Type::Break => return Err(HashDerivationError::EmptyEnvelope),
        _ => {}
    }
    let start = d.position();
    d.skip()?;
    Ok(&block_bytes[start..d.position()])
}

/// A header's captured encoding with its lazily computed identifier.
///
/// The identifier is computed on first request and cached for the life of
/// the value. `OnceCell` makes a racing first access safe; both racers
/// would produce the same digest.
#[derive(Clone)]
pub struct RawHeader {
    bytes: Bytes,
    prefix: HeaderPrefix,
    id: OnceCell<Blake2b256>,
}

impl RawHeader {
    pub fn new(bytes: impl Into<Bytes>, prefix: HeaderPrefix) -> Self {
        Self {
            bytes: bytes.into(),
            prefix,
            id: OnceCell::new(),
        }
    }

    /// Capture the header span of an encoded block.
    pub fn from_block(block_bytes: &[u8], prefix: HeaderPrefix) -> Result<Self, HashDerivationError> {
        let span = extract_header_span(block_bytes)?;
        Ok(Self::new(Bytes::copy_from_slice(span), prefix))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn prefix(&self) -> HeaderPrefix {
        self.prefix
    }

    pub fn id(&self) -> Blake2b256 {
        *self
            .id
            .get_or_init(|| derive_header_id(self.prefix, &self.bytes))
    }

    pub fn id_hex(&self) -> String {
        self.id().to_hex()
    }

    /// Whether the identifier has been computed yet.
    pub fn is_id_cached(&self) -> bool {
        self.id.get().is_some()
    }
}

impl PartialEq for RawHeader {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.bytes == other.bytes
    }
}

impl Eq for RawHeader {}

impl fmt::Debug for RawHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawHeader")
            .field("len", &self.bytes.len())
            .field("prefix", &self.prefix)
            .field("id", &self.id.get())
            .finish()
    }
}

impl Serialize for RawHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id_hex())
    }
}
