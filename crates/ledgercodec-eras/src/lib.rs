//! # ledgercodec-eras
//!
//! Per-era schemas and typed structures for Byron, Shelley, Allegra,
//! Mary, Alonzo and Babbage, plus the tag-dispatched facade.
//!
//! Each era's schemas are composed from its predecessor's, so a later
//! era's transaction body or witness set always contains every key of
//! the earlier one under the same name.
//!
//! # Example
//!
//! ```no_run
//! use ledgercodec_eras::decode_block;
//!
//! let bytes: Vec<u8> = std::fs::read("block.cbor").unwrap();
//! let block = decode_block(2, &bytes).unwrap();
//! println!("{} #{} slot {}", block.id(), block.block_number(), block.slot_number());
//! ```

pub mod allegra;
pub mod alonzo;
pub mod babbage;
pub mod block;
pub mod byron;
pub mod common;
pub mod mary;
pub mod schemas;
pub mod shelley;
pub mod tx;

pub use block::{decode_block, decode_block_header, decode_header_content, Block, BlockHeader};
pub use common::{
    Amount, FromHeaderRecord, OperationalCert, OutputFormat, ProtocolParameterUpdate,
    ProtocolVersion, TransactionInput, TransactionOutput,
};
pub use schemas::EraSchemas;
pub use tx::{decode_transaction, decode_transaction_body, Transaction, TransactionBody};
