//! # ledgercodec-core
//!
//! Core primitives shared across all LedgerCodec crates: digest and
//! opaque value types, the era registry, the record schema model, the
//! schema-driven CBOR decode engine and the block-header identifier
//! deriver. Per-era schemas and typed structures are built on top of the
//! interfaces defined here.

pub mod engine;
pub mod era;
pub mod error;
pub mod hash;
pub mod header_id;
pub mod record;
pub mod schema;
pub mod value;

pub use era::{BlockType, Era, EraDescriptor, ERAS};
pub use error::{
    BatchDecodeError, DecodeError, HashDerivationError, LedgerError, SchemaError, TagSpace,
};
pub use hash::{Blake2b224, Blake2b256, Hash};
pub use header_id::{HeaderPrefix, RawHeader};
pub use record::{FromRecord, Record, Value};
pub use schema::{FieldDef, FieldType, RecordSchema, SchemaBuilder, WireShape};
pub use value::{DeferredValue, OpaqueValue};
