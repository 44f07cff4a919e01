//! Byron: the original era, with two block sub-kinds.
//!
//! Main blocks carry transactions; epoch-boundary blocks only carry the
//! list of stakeholder hashes for the new epoch. Neither header shares a
//! shape with later eras, and both are hashed behind a synthetic prefix
//! naming the sub-kind.

use ledgercodec_core::engine;
use ledgercodec_core::{
    Blake2b224, Blake2b256, DecodeError, FieldType, FromRecord, HeaderPrefix, LedgerError,
    OpaqueValue, RawHeader, Record, RecordSchema, Value,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;

use crate::common::FromHeaderRecord;
use crate::shelley::decode_header_with;

// ─── Schemas ─────────────────────────────────────────────────────────────────

pub static SLOT_ID: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronSlotId")
        .field(0, "epoch", FieldType::Uint)
        .field(1, "slot", FieldType::Uint)
        .build()
});

pub static DIFFICULTY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronDifficulty")
        .field(0, "value", FieldType::Uint)
        .build()
});

pub static BLOCK_VERSION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronBlockVersion")
        .field(0, "major", FieldType::Uint)
        .field(1, "minor", FieldType::Uint)
        .field(2, "alt", FieldType::Uint)
        .build()
});

pub static SOFTWARE_VERSION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronSoftwareVersion")
        .field(0, "name", FieldType::Text)
        .field(1, "version", FieldType::Uint)
        .build()
});

pub static MAIN_CONSENSUS_DATA: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronMainConsensusData")
        .field(0, "slot_id", FieldType::record(&SLOT_ID))
        .field(1, "issuer_key", FieldType::Bytes)
        .field(2, "difficulty", FieldType::record(&DIFFICULTY))
        .field(3, "block_signature", FieldType::Opaque)
        .build()
});

pub static MAIN_EXTRA_DATA: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronMainExtraData")
        .field(0, "block_version", FieldType::record(&BLOCK_VERSION))
        .field(1, "software_version", FieldType::record(&SOFTWARE_VERSION))
        .field(2, "attributes", FieldType::Opaque)
        .field(3, "extra_proof", FieldType::Hash32)
        .build()
});

pub static MAIN_BLOCK_HEADER: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronMainBlockHeader")
        .field(0, "protocol_magic", FieldType::Uint)
        .field(1, "prev_block", FieldType::Hash32)
        .field(2, "body_proof", FieldType::Opaque)
        .field(3, "consensus_data", FieldType::record(&MAIN_CONSENSUS_DATA))
        .field(4, "extra_data", FieldType::record(&MAIN_EXTRA_DATA))
        .build()
});

pub static MAIN_BLOCK_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronMainBlockBody")
        .field(0, "tx_payload", FieldType::list(FieldType::Opaque))
        .field(1, "ssc_payload", FieldType::Opaque)
        .field(2, "dlg_payload", FieldType::list(FieldType::Opaque))
        .field(3, "update_payload", FieldType::Opaque)
        .build()
});

pub static MAIN_BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronMainBlock")
        .field(0, "header", FieldType::record(&MAIN_BLOCK_HEADER))
        .field(1, "body", FieldType::record(&MAIN_BLOCK_BODY))
        .field(2, "extra", FieldType::list(FieldType::Opaque))
        .build()
});

pub static EBB_CONSENSUS_DATA: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronEpochBoundaryConsensusData")
        .field(0, "epoch", FieldType::Uint)
        .field(1, "difficulty", FieldType::record(&DIFFICULTY))
        .build()
});

pub static EBB_BLOCK_HEADER: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronEpochBoundaryBlockHeader")
        .field(0, "protocol_magic", FieldType::Uint)
        .field(1, "prev_block", FieldType::Hash32)
        .field(2, "body_proof", FieldType::Opaque)
        .field(3, "consensus_data", FieldType::record(&EBB_CONSENSUS_DATA))
        .field(4, "extra_data", FieldType::Opaque)
        .build()
});

pub static EBB_BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ByronEpochBoundaryBlock")
        .field(0, "header", FieldType::record(&EBB_BLOCK_HEADER))
        .field(1, "body", FieldType::list(FieldType::Hash28))
        .field(2, "extra", FieldType::list(FieldType::Opaque))
        .build()
});

// ─── Main block ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByronSlotId {
    pub epoch: u64,
    pub slot: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByronBlockVersion {
    pub major: u16,
    pub minor: u16,
    pub alt: u8,
}

impl FromRecord for ByronBlockVersion {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            major: r.take_uint_as(0)?,
            minor: r.take_uint_as(1)?,
            alt: r.take_uint_as(2)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByronSoftwareVersion {
    pub name: String,
    pub version: u32,
}

impl FromRecord for ByronSoftwareVersion {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            name: r.take_text(0)?,
            version: r.take_uint_as(1)?,
        })
    }
}

fn take_difficulty(r: &mut Record, key: u64) -> Result<u64, DecodeError> {
    r.take_record(key)?.take_uint(0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronMainConsensusData {
    pub slot_id: ByronSlotId,
    #[serde(with = "hex")]
    pub issuer_key: Vec<u8>,
    pub difficulty: u64,
    pub block_signature: OpaqueValue,
}

impl FromRecord for ByronMainConsensusData {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let mut slot_id = r.take_record(0)?;
        Ok(Self {
            slot_id: ByronSlotId {
                epoch: slot_id.take_uint(0)?,
                slot: slot_id.take_uint_as(1)?,
            },
            issuer_key: r.take_bytes(1)?,
            difficulty: take_difficulty(&mut r, 2)?,
            block_signature: r.take_opaque(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronMainExtraData {
    pub block_version: ByronBlockVersion,
    pub software_version: ByronSoftwareVersion,
    pub attributes: OpaqueValue,
    pub extra_proof: Blake2b256,
}

impl FromRecord for ByronMainExtraData {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            block_version: r.take_typed(0)?,
            software_version: r.take_typed(1)?,
            attributes: r.take_opaque(2)?,
            extra_proof: r.take_hash32(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronMainBlockHeader {
    #[serde(rename = "id")]
    pub raw: RawHeader,
    pub protocol_magic: u32,
    pub prev_block: Blake2b256,
    pub body_proof: OpaqueValue,
    pub consensus_data: ByronMainConsensusData,
    pub extra_data: ByronMainExtraData,
}

impl FromHeaderRecord for ByronMainBlockHeader {
    fn from_header_record(mut r: Record, raw: RawHeader) -> Result<Self, DecodeError> {
        Ok(Self {
            raw,
            protocol_magic: r.take_uint_as(0)?,
            prev_block: r.take_hash32(1)?,
            body_proof: r.take_opaque(2)?,
            consensus_data: r.take_typed(3)?,
            extra_data: r.take_typed(4)?,
        })
    }
}

impl ByronMainBlockHeader {
    pub fn id(&self) -> Blake2b256 {
        self.raw.id()
    }

    pub fn id_hex(&self) -> String {
        self.raw.id_hex()
    }

    pub fn epoch(&self) -> u64 {
        self.consensus_data.slot_id.epoch
    }

    /// Slot within the epoch, not an absolute slot.
    pub fn slot_number(&self) -> u64 {
        u64::from(self.consensus_data.slot_id.slot)
    }

    /// Byron headers carry no block number.
    pub fn block_number(&self) -> u64 {
        0
    }

    pub fn prev_hash(&self) -> Option<Blake2b256> {
        Some(self.prev_block)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronMainBlockBody {
    pub tx_payload: Vec<OpaqueValue>,
    pub ssc_payload: OpaqueValue,
    pub dlg_payload: Vec<OpaqueValue>,
    pub update_payload: OpaqueValue,
}

impl FromRecord for ByronMainBlockBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            tx_payload: r.take_list_with(0, Value::into_opaque)?,
            ssc_payload: r.take_opaque(1)?,
            dlg_payload: r.take_list_with(2, Value::into_opaque)?,
            update_payload: r.take_opaque(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronMainBlock {
    pub header: ByronMainBlockHeader,
    pub body: ByronMainBlockBody,
    pub extra: Vec<OpaqueValue>,
}

impl ByronMainBlock {
    pub fn id(&self) -> Blake2b256 {
        self.header.id()
    }

    pub fn transaction_count(&self) -> usize {
        self.body.tx_payload.len()
    }
}

// ─── Epoch-boundary block ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronEpochBoundaryBlockHeader {
    #[serde(rename = "id")]
    pub raw: RawHeader,
    pub protocol_magic: u32,
    pub prev_block: Blake2b256,
    pub body_proof: OpaqueValue,
    pub epoch: u64,
    pub difficulty: u64,
    pub extra_data: OpaqueValue,
}

impl FromHeaderRecord for ByronEpochBoundaryBlockHeader {
    fn from_header_record(mut r: Record, raw: RawHeader) -> Result<Self, DecodeError> {
        let protocol_magic = r.take_uint_as(0)?;
        let prev_block = r.take_hash32(1)?;
        let body_proof = r.take_opaque(2)?;
        let mut consensus = r.take_record(3)?;
        Ok(Self {
            raw,
            protocol_magic,
            prev_block,
            body_proof,
            epoch: consensus.take_uint(0)?,
            difficulty: take_difficulty(&mut consensus, 1)?,
            extra_data: r.take_opaque(4)?,
        })
    }
}

impl ByronEpochBoundaryBlockHeader {
    pub fn id(&self) -> Blake2b256 {
        self.raw.id()
    }

    pub fn id_hex(&self) -> String {
        self.raw.id_hex()
    }

    /// Boundary blocks sit before the first slot of their epoch.
    pub fn slot_number(&self) -> u64 {
        0
    }

    pub fn block_number(&self) -> u64 {
        0
    }

    pub fn prev_hash(&self) -> Option<Blake2b256> {
        Some(self.prev_block)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByronEpochBoundaryBlock {
    pub header: ByronEpochBoundaryBlockHeader,
    pub stakeholders: Vec<Blake2b224>,
    pub extra: Vec<OpaqueValue>,
}

impl ByronEpochBoundaryBlock {
    pub fn id(&self) -> Blake2b256 {
        self.header.id()
    }
}

// ─── Transactions ────────────────────────────────────────────────────────────

/// A Byron transaction, kept as its generic CBOR tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ByronTransaction(pub OpaqueValue);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ByronTransactionBody(pub OpaqueValue);

// ─── Entry points ────────────────────────────────────────────────────────────

pub fn decode_main_block(data: &[u8]) -> Result<ByronMainBlock, LedgerError> {
    let (mut r, _) = engine::decode(&MAIN_BLOCK, data)?;
    let raw = RawHeader::from_block(data, HeaderPrefix::ByronMain)?;
    let header = ByronMainBlockHeader::from_header_record(r.take_record(0)?, raw)?;
    Ok(ByronMainBlock {
        header,
        body: r.take_typed(1)?,
        extra: r.take_list_with(2, Value::into_opaque)?,
    })
}

pub fn decode_epoch_boundary_block(data: &[u8]) -> Result<ByronEpochBoundaryBlock, LedgerError> {
    let (mut r, _) = engine::decode(&EBB_BLOCK, data)?;
    let raw = RawHeader::from_block(data, HeaderPrefix::ByronEpochBoundary)?;
    let header = ByronEpochBoundaryBlockHeader::from_header_record(r.take_record(0)?, raw)?;
    Ok(ByronEpochBoundaryBlock {
        header,
        stakeholders: r.take_list_with(1, Value::into_hash28)?,
        extra: r.take_list_with(2, Value::into_opaque)?,
    })
}

pub fn decode_main_block_header(data: &[u8]) -> Result<ByronMainBlockHeader, DecodeError> {
    decode_header_with(&MAIN_BLOCK_HEADER, HeaderPrefix::ByronMain, data)
}

pub fn decode_epoch_boundary_block_header(
    data: &[u8],
) -> Result<ByronEpochBoundaryBlockHeader, DecodeError> {
    decode_header_with(&EBB_BLOCK_HEADER, HeaderPrefix::ByronEpochBoundary, data)
}

pub fn decode_transaction(data: &[u8]) -> Result<ByronTransaction, DecodeError> {
    engine::decode_opaque(data).map(|(v, _)| ByronTransaction(v))
}

pub fn decode_transaction_body(data: &[u8]) -> Result<ByronTransactionBody, DecodeError> {
    engine::decode_opaque(data).map(|(v, _)| ByronTransactionBody(v))
}
