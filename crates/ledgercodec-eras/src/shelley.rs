//! Shelley: the first post-Byron era and the base every later era
//! composes on.
//!
//! The Shelley block header is shared by Allegra, Mary and Alonzo.

use ledgercodec_core::engine;
use ledgercodec_core::{
    Blake2b256, DecodeError, DeferredValue, FieldType, FromRecord, HeaderPrefix, LedgerError,
    OpaqueValue, RawHeader, Record, RecordSchema, Value,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::common::{
    check_aligned, check_indices, output_from_value, FromHeaderRecord, OperationalCert,
    ProtocolParameterUpdate, ProtocolVersion, TransactionInput, TransactionOutput,
    PROTOCOL_PARAMETER_UPDATE, TRANSACTION_INPUT,
};

// ─── Schemas ─────────────────────────────────────────────────────────────────

pub static TRANSACTION_OUTPUT: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ShelleyTransactionOutput")
        .field(0, "address", FieldType::Bytes)
        .field(1, "amount", FieldType::Uint)
        .build()
});

pub static TRANSACTION_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::map("ShelleyTransactionBody")
        .field(0, "inputs", FieldType::list(FieldType::record(&TRANSACTION_INPUT)))
        .field(1, "outputs", FieldType::list(FieldType::record(&TRANSACTION_OUTPUT)))
        .field(2, "fee", FieldType::Uint)
        .optional(3, "ttl", FieldType::Uint)
        .optional(4, "certificates", FieldType::list(FieldType::Opaque))
        .optional(5, "withdrawals", FieldType::Deferred)
        .optional(6, "update", FieldType::record(&PROTOCOL_PARAMETER_UPDATE))
        .optional(7, "metadata_hash", FieldType::Hash32)
        .build()
});

pub static TRANSACTION_WITNESS_SET: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::map("ShelleyTransactionWitnessSet")
        .optional(0, "vkey_witnesses", FieldType::list(FieldType::Opaque))
        .optional(1, "native_scripts", FieldType::list(FieldType::Opaque))
        .optional(2, "bootstrap_witnesses", FieldType::list(FieldType::Opaque))
        .build()
});

pub static HEADER_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ShelleyBlockHeaderBody")
        .field(0, "block_number", FieldType::Uint)
        .field(1, "slot", FieldType::Uint)
        .field(2, "prev_hash", FieldType::nullable(FieldType::Hash32))
        .field(3, "issuer_vkey", FieldType::Opaque)
        .field(4, "vrf_key", FieldType::Opaque)
        .field(5, "nonce_vrf", FieldType::Opaque)
        .field(6, "leader_vrf", FieldType::Opaque)
        .field(7, "block_body_size", FieldType::Uint)
        .field(8, "block_body_hash", FieldType::Hash32)
        .field(9, "opcert_hot_vkey", FieldType::Opaque)
        .field(10, "opcert_sequence_number", FieldType::Uint)
        .field(11, "opcert_kes_period", FieldType::Uint)
        .field(12, "opcert_signature", FieldType::Opaque)
        .field(13, "protocol_major", FieldType::Uint)
        .field(14, "protocol_minor", FieldType::Uint)
        .build()
});

pub static BLOCK_HEADER: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ShelleyBlockHeader")
        .field(0, "body", FieldType::record(&HEADER_BODY))
        .field(1, "signature", FieldType::Opaque)
        .build()
});

pub static BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ShelleyBlock")
        .field(0, "header", FieldType::record(&BLOCK_HEADER))
        .field(
            1,
            "transaction_bodies",
            FieldType::list(FieldType::record(&TRANSACTION_BODY)),
        )
        .field(
            2,
            "transaction_witness_sets",
            FieldType::list(FieldType::record(&TRANSACTION_WITNESS_SET)),
        )
        .field(
            3,
            "transaction_metadata_set",
            FieldType::uint_map(FieldType::Deferred),
        )
        .build()
});

pub static TRANSACTION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ShelleyTransaction")
        .field(0, "body", FieldType::record(&TRANSACTION_BODY))
        .field(1, "witness_set", FieldType::record(&TRANSACTION_WITNESS_SET))
        .optional(2, "metadata", FieldType::nullable(FieldType::Deferred))
        .build()
});

// ─── Header ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelleyHeaderBody {
    pub block_number: u64,
    pub slot: u64,
    pub prev_hash: Option<Blake2b256>,
    pub issuer_vkey: OpaqueValue,
    pub vrf_key: OpaqueValue,
    pub nonce_vrf: OpaqueValue,
    pub leader_vrf: OpaqueValue,
    pub block_body_size: u32,
    pub block_body_hash: Blake2b256,
    pub operational_cert: OperationalCert,
    pub protocol_version: ProtocolVersion,
}

impl FromRecord for ShelleyHeaderBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            block_number: r.take_uint(0)?,
            slot: r.take_uint(1)?,
            prev_hash: r.take_hash32_opt(2)?,
            issuer_vkey: r.take_opaque(3)?,
            vrf_key: r.take_opaque(4)?,
            nonce_vrf: r.take_opaque(5)?,
            leader_vrf: r.take_opaque(6)?,
            block_body_size: r.take_uint_as(7)?,
            block_body_hash: r.take_hash32(8)?,
            operational_cert: OperationalCert {
                hot_vkey: r.take_opaque(9)?,
                sequence_number: r.take_uint_as(10)?,
                kes_period: r.take_uint_as(11)?,
                signature: r.take_opaque(12)?,
            },
            protocol_version: ProtocolVersion {
                major: r.take_uint(13)?,
                minor: r.take_uint(14)?,
            },
        })
    }
}

/// Header shared by Shelley, Allegra, Mary and Alonzo blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelleyBlockHeader {
    #[serde(rename = "id")]
    pub raw: RawHeader,
    pub body: ShelleyHeaderBody,
    pub signature: OpaqueValue,
}

impl FromHeaderRecord for ShelleyBlockHeader {
    fn from_header_record(mut r: Record, raw: RawHeader) -> Result<Self, DecodeError> {
        Ok(Self {
            raw,
            body: r.take_typed(0)?,
            signature: r.take_opaque(1)?,
        })
    }
}

impl ShelleyBlockHeader {
    pub fn id(&self) -> Blake2b256 {
        self.raw.id()
    }

    pub fn id_hex(&self) -> String {
        self.raw.id_hex()
    }

    pub fn block_number(&self) -> u64 {
        self.body.block_number
    }

    pub fn slot_number(&self) -> u64 {
        self.body.slot
    }

    pub fn prev_hash(&self) -> Option<Blake2b256> {
        self.body.prev_hash
    }
}

// ─── Transaction body / witness set ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelleyTransactionBody {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: u64,
    pub ttl: u64,
    pub certificates: Vec<OpaqueValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawals: Option<DeferredValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<ProtocolParameterUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_hash: Option<Blake2b256>,
}

impl FromRecord for ShelleyTransactionBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            inputs: r.take_list_of(0)?,
            outputs: r.take_list_with(1, output_from_value)?,
            fee: r.take_uint(2)?,
            ttl: r.take_uint(3)?,
            certificates: r.take_list_with(4, Value::into_opaque)?,
            withdrawals: r.take_deferred_opt(5)?,
            update: r.take_typed_opt(6)?,
            metadata_hash: r.take_hash32_opt(7)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShelleyTransactionWitnessSet {
    pub vkey_witnesses: Vec<OpaqueValue>,
    pub native_scripts: Vec<OpaqueValue>,
    pub bootstrap_witnesses: Vec<OpaqueValue>,
}

impl FromRecord for ShelleyTransactionWitnessSet {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            vkey_witnesses: r.take_list_with(0, Value::into_opaque)?,
            native_scripts: r.take_list_with(1, Value::into_opaque)?,
            bootstrap_witnesses: r.take_list_with(2, Value::into_opaque)?,
        })
    }
}

// ─── Block / transaction ─────────────────────────────────────────────────────

/// Block layout shared by Shelley, Allegra and Mary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelleyBlock<B = ShelleyTransactionBody, W = ShelleyTransactionWitnessSet> {
    pub header: ShelleyBlockHeader,
    pub transaction_bodies: Vec<B>,
    pub transaction_witness_sets: Vec<W>,
    pub transaction_metadata_set: BTreeMap<u64, DeferredValue>,
}

impl<B: FromRecord, W: FromRecord> ShelleyBlock<B, W> {
    pub(crate) fn from_parts(mut r: Record, raw: RawHeader) -> Result<Self, DecodeError> {
        let header = ShelleyBlockHeader::from_header_record(r.take_record(0)?, raw)?;
        let transaction_bodies = r.take_list_of(1)?;
        let transaction_witness_sets = r.take_list_of(2)?;
        let transaction_metadata_set = take_metadata_set(&mut r, 3)?;

        check_aligned(transaction_bodies.len(), transaction_witness_sets.len())?;
        check_indices(
            "metadata",
            transaction_metadata_set.keys(),
            transaction_bodies.len(),
        )?;

        Ok(Self {
            header,
            transaction_bodies,
            transaction_witness_sets,
            transaction_metadata_set,
        })
    }

    pub fn id(&self) -> Blake2b256 {
        self.header.id()
    }

    pub fn block_number(&self) -> u64 {
        self.header.block_number()
    }

    pub fn slot_number(&self) -> u64 {
        self.header.slot_number()
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_bodies.len()
    }
}

pub(crate) fn take_metadata_set(
    r: &mut Record,
    key: u64,
) -> Result<BTreeMap<u64, DeferredValue>, DecodeError> {
    r.take_uint_map(key)?
        .into_iter()
        .map(|(k, v)| Ok((k, v.into_deferred()?)))
        .collect()
}

/// Transaction layout shared by Shelley, Allegra and Mary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelleyTransaction<B = ShelleyTransactionBody> {
    pub body: B,
    pub witness_set: ShelleyTransactionWitnessSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DeferredValue>,
}

impl<B: FromRecord> FromRecord for ShelleyTransaction<B> {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            body: r.take_typed(0)?,
            witness_set: r.take_typed(1)?,
            metadata: r.take_deferred_opt(2)?,
        })
    }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Decode a block of the Shelley layout against `schema`, capturing the
/// header's raw span from the envelope.
pub(crate) fn decode_block_with<B: FromRecord, W: FromRecord>(
    schema: &RecordSchema,
    data: &[u8],
) -> Result<ShelleyBlock<B, W>, LedgerError> {
    let (record, _) = engine::decode(schema, data)?;
    let raw = RawHeader::from_block(data, HeaderPrefix::None)?;
    Ok(ShelleyBlock::from_parts(record, raw)?)
}

/// Decode a standalone header; its identifier covers exactly the bytes
/// consumed.
pub(crate) fn decode_header_with<H: FromHeaderRecord>(
    schema: &RecordSchema,
    prefix: HeaderPrefix,
    data: &[u8],
) -> Result<H, DecodeError> {
    let (record, consumed) = engine::decode(schema, data)?;
    H::from_header_record(record, RawHeader::new(data[..consumed].to_vec(), prefix))
}

pub fn decode_block(data: &[u8]) -> Result<ShelleyBlock, LedgerError> {
    decode_block_with(&BLOCK, data)
}

pub fn decode_block_header(data: &[u8]) -> Result<ShelleyBlockHeader, DecodeError> {
    decode_header_with(&BLOCK_HEADER, HeaderPrefix::None, data)
}

pub fn decode_transaction_body(data: &[u8]) -> Result<ShelleyTransactionBody, DecodeError> {
    engine::decode_as(&TRANSACTION_BODY, data).map(|(body, _)| body)
}

pub fn decode_transaction(data: &[u8]) -> Result<ShelleyTransaction, DecodeError> {
    engine::decode_as(&TRANSACTION, data).map(|(tx, _)| tx)
}
