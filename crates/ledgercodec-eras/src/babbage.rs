//! Babbage: map-coded outputs with inline datums and reference scripts,
//! collateral return and reference inputs on bodies, and a restructured
//! header body with nested operational certificate and protocol version.

use ledgercodec_core::engine;
use ledgercodec_core::{
    Blake2b256, DecodeError, FieldType, FromRecord, HeaderPrefix, LedgerError, OpaqueValue,
    RawHeader, Record, RecordSchema, Value,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

use crate::alonzo::{self, AlonzoBlock, AlonzoTransaction, AlonzoTransactionBody, AlonzoTransactionWitnessSet};
use crate::common::{
    amount_type, output_from_value, FromHeaderRecord, OperationalCert, ProtocolVersion,
    TransactionInput, TransactionOutput, OPERATIONAL_CERT, PROTOCOL_VERSION, TRANSACTION_INPUT,
};
use crate::shelley::decode_header_with;

// ─── Schemas ─────────────────────────────────────────────────────────────────

/// Post-Alonzo map-coded output.
pub static TRANSACTION_OUTPUT_MAP: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::map("BabbageTransactionOutput")
        .field(0, "address", FieldType::Bytes)
        .field(1, "amount", amount_type())
        .optional(2, "datum_option", FieldType::Opaque)
        .optional(3, "script_ref", FieldType::Deferred)
        .build()
});

/// Either the legacy array layout or the map layout, chosen by the wire.
pub fn output_type() -> FieldType {
    FieldType::Choice(vec![
        FieldType::record(&alonzo::TRANSACTION_OUTPUT),
        FieldType::record(&TRANSACTION_OUTPUT_MAP),
    ])
}

pub static TRANSACTION_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&alonzo::TRANSACTION_BODY, "BabbageTransactionBody")
        .loosen(1, FieldType::list(output_type()))
        .optional(16, "collateral_return", output_type())
        .optional(17, "total_collateral", FieldType::Uint)
        .optional(18, "reference_inputs", FieldType::list(FieldType::record(&TRANSACTION_INPUT)))
        .build()
});

pub static TRANSACTION_WITNESS_SET: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&alonzo::TRANSACTION_WITNESS_SET, "BabbageTransactionWitnessSet")
        .optional(6, "plutus_v2_scripts", FieldType::Opaque)
        .build()
});

pub static HEADER_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("BabbageBlockHeaderBody")
        .field(0, "block_number", FieldType::Uint)
        .field(1, "slot", FieldType::Uint)
        .field(2, "prev_hash", FieldType::nullable(FieldType::Hash32))
        .field(3, "issuer_vkey", FieldType::Opaque)
        .field(4, "vrf_key", FieldType::Opaque)
        .field(5, "vrf_result", FieldType::Opaque)
        .field(6, "block_body_size", FieldType::Uint)
        .field(7, "block_body_hash", FieldType::Hash32)
        .field(8, "operational_cert", FieldType::record(&OPERATIONAL_CERT))
        .field(9, "protocol_version", FieldType::record(&PROTOCOL_VERSION))
        .build()
});

pub static BLOCK_HEADER: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("BabbageBlockHeader")
        .field(0, "body", FieldType::record(&HEADER_BODY))
        .field(1, "signature", FieldType::Opaque)
        .build()
});

pub static BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&alonzo::BLOCK, "BabbageBlock")
        .loosen(0, FieldType::record(&BLOCK_HEADER))
        .loosen(1, FieldType::list(FieldType::record(&TRANSACTION_BODY)))
        .loosen(2, FieldType::list(FieldType::record(&TRANSACTION_WITNESS_SET)))
        .build()
});

pub static TRANSACTION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&alonzo::TRANSACTION, "BabbageTransaction")
        .loosen(0, FieldType::record(&TRANSACTION_BODY))
        .loosen(1, FieldType::record(&TRANSACTION_WITNESS_SET))
        .build()
});

// ─── Header ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BabbageHeaderBody {
    pub block_number: u64,
    pub slot: u64,
    pub prev_hash: Option<Blake2b256>,
    pub issuer_vkey: OpaqueValue,
    pub vrf_key: OpaqueValue,
    pub vrf_result: OpaqueValue,
    pub block_body_size: u32,
    pub block_body_hash: Blake2b256,
    pub operational_cert: OperationalCert,
    pub protocol_version: ProtocolVersion,
}

impl FromRecord for BabbageHeaderBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            block_number: r.take_uint(0)?,
            slot: r.take_uint(1)?,
            prev_hash: r.take_hash32_opt(2)?,
            issuer_vkey: r.take_opaque(3)?,
            vrf_key: r.take_opaque(4)?,
            vrf_result: r.take_opaque(5)?,
            block_body_size: r.take_uint_as(6)?,
            block_body_hash: r.take_hash32(7)?,
            operational_cert: r.take_typed(8)?,
            protocol_version: r.take_typed(9)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BabbageBlockHeader {
    #[serde(rename = "id")]
    pub raw: RawHeader,
    pub body: BabbageHeaderBody,
    pub signature: OpaqueValue,
}

impl FromHeaderRecord for BabbageBlockHeader {
    fn from_header_record(mut r: Record, raw: RawHeader) -> Result<Self, DecodeError> {
        Ok(Self {
            raw,
            body: r.take_typed(0)?,
            signature: r.take_opaque(1)?,
        })
    }
}

impl BabbageBlockHeader {
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
pub struct BabbageTransactionBody {
    #[serde(flatten)]
    pub alonzo: AlonzoTransactionBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral_return: Option<TransactionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_collateral: Option<u64>,
    pub reference_inputs: Vec<TransactionInput>,
}

impl Deref for BabbageTransactionBody {
    type Target = AlonzoTransactionBody;

    fn deref(&self) -> &Self::Target {
        &self.alonzo
    }
}

impl FromRecord for BabbageTransactionBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let collateral_return = match r.take(16) {
            Value::Absent => None,
            v => Some(output_from_value(v)?),
        };
        let total_collateral = Some(r.take_uint(17)?).filter(|&c| c != 0);
        let reference_inputs = r.take_list_of(18)?;
        Ok(Self {
            alonzo: AlonzoTransactionBody::from_record(r)?,
            collateral_return,
            total_collateral,
            reference_inputs,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BabbageTransactionWitnessSet {
    #[serde(flatten)]
    pub alonzo: AlonzoTransactionWitnessSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plutus_v2_scripts: Option<OpaqueValue>,
}

impl Deref for BabbageTransactionWitnessSet {
    type Target = AlonzoTransactionWitnessSet;

    fn deref(&self) -> &Self::Target {
        &self.alonzo
    }
}

impl FromRecord for BabbageTransactionWitnessSet {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let plutus_v2_scripts = r.take_opaque_opt(6)?;
        Ok(Self {
            alonzo: AlonzoTransactionWitnessSet::from_record(r)?,
            plutus_v2_scripts,
        })
    }
}

// ─── Block / transaction ─────────────────────────────────────────────────────

pub type BabbageBlock =
    AlonzoBlock<BabbageBlockHeader, BabbageTransactionBody, BabbageTransactionWitnessSet>;
pub type BabbageTransaction = AlonzoTransaction<BabbageTransactionBody, BabbageTransactionWitnessSet>;

impl BabbageBlock {
    pub fn id(&self) -> Blake2b256 {
        self.header.id()
    }

    pub fn block_number(&self) -> u64 {
        self.header.block_number()
    }

    pub fn slot_number(&self) -> u64 {
        self.header.slot_number()
    }
}

pub fn decode_block(data: &[u8]) -> Result<BabbageBlock, LedgerError> {
    alonzo::decode_block_with(&BLOCK, data)
}

pub fn decode_block_header(data: &[u8]) -> Result<BabbageBlockHeader, DecodeError> {
    decode_header_with(&BLOCK_HEADER, HeaderPrefix::None, data)
}

pub fn decode_transaction_body(data: &[u8]) -> Result<BabbageTransactionBody, DecodeError> {
    engine::decode_as(&TRANSACTION_BODY, data).map(|(body, _)| body)
}

pub fn decode_transaction(data: &[u8]) -> Result<BabbageTransaction, DecodeError> {
    engine::decode_as(&TRANSACTION, data).map(|(tx, _)| tx)
}
