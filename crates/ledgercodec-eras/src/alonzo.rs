//! Alonzo: smart contracts. Bodies gain script-data hash, collateral,
//! required signers and network id; witness sets gain scripts, datums and
//! redeemers; blocks list the transactions whose validity flag is false.

use ledgercodec_core::engine;
use ledgercodec_core::{
    Blake2b224, Blake2b256, DecodeError, DeferredValue, FieldType, FromRecord, HeaderPrefix,
    LedgerError, OpaqueValue, RawHeader, Record, RecordSchema, Value,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use crate::common::{check_aligned, check_indices, FromHeaderRecord, TransactionInput, TRANSACTION_INPUT};
use crate::mary::{self, MaryTransactionBody};
use crate::shelley::{self, take_metadata_set, ShelleyBlockHeader, ShelleyTransactionWitnessSet};

pub static TRANSACTION_OUTPUT: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&mary::TRANSACTION_OUTPUT, "AlonzoTransactionOutput")
        .optional(2, "datum_hash", FieldType::Hash32)
        .build()
});

pub static TRANSACTION_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&mary::TRANSACTION_BODY, "AlonzoTransactionBody")
        .loosen(1, FieldType::list(FieldType::record(&TRANSACTION_OUTPUT)))
        .optional(11, "script_data_hash", FieldType::Hash32)
        .optional(13, "collateral", FieldType::list(FieldType::record(&TRANSACTION_INPUT)))
        .optional(14, "required_signers", FieldType::list(FieldType::Hash28))
        .optional(15, "network_id", FieldType::Uint)
        .build()
});

pub static TRANSACTION_WITNESS_SET: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&shelley::TRANSACTION_WITNESS_SET, "AlonzoTransactionWitnessSet")
        .optional(3, "plutus_scripts", FieldType::Opaque)
        .optional(4, "plutus_data", FieldType::Deferred)
        .optional(5, "redeemers", FieldType::Deferred)
        .build()
});

pub static BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&mary::BLOCK, "AlonzoBlock")
        .loosen(1, FieldType::list(FieldType::record(&TRANSACTION_BODY)))
        .loosen(2, FieldType::list(FieldType::record(&TRANSACTION_WITNESS_SET)))
        .field(4, "invalid_transactions", FieldType::list(FieldType::Uint))
        .build()
});

pub static TRANSACTION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("AlonzoTransaction")
        .field(0, "body", FieldType::record(&TRANSACTION_BODY))
        .field(1, "witness_set", FieldType::record(&TRANSACTION_WITNESS_SET))
        .field(2, "is_valid", FieldType::Bool)
        .optional(3, "auxiliary_data", FieldType::nullable(FieldType::Deferred))
        .build()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlonzoTransactionBody {
    #[serde(flatten)]
    pub mary: MaryTransactionBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_data_hash: Option<Blake2b256>,
    pub collateral: Vec<TransactionInput>,
    pub required_signers: Vec<Blake2b224>,
    pub network_id: u8,
}

impl Deref for AlonzoTransactionBody {
    type Target = MaryTransactionBody;

    fn deref(&self) -> &Self::Target {
        &self.mary
    }
}

impl FromRecord for AlonzoTransactionBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let script_data_hash = r.take_hash32_opt(11)?;
        let collateral = r.take_list_of(13)?;
        let required_signers = r.take_list_with(14, Value::into_hash28)?;
        let network_id = r.take_uint_as(15)?;
        Ok(Self {
            mary: MaryTransactionBody::from_record(r)?,
            script_data_hash,
            collateral,
            required_signers,
            network_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlonzoTransactionWitnessSet {
    #[serde(flatten)]
    pub shelley: ShelleyTransactionWitnessSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plutus_scripts: Option<OpaqueValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plutus_data: Option<DeferredValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redeemers: Option<DeferredValue>,
}

impl Deref for AlonzoTransactionWitnessSet {
    type Target = ShelleyTransactionWitnessSet;

    fn deref(&self) -> &Self::Target {
        &self.shelley
    }
}

impl FromRecord for AlonzoTransactionWitnessSet {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let plutus_scripts = r.take_opaque_opt(3)?;
        let plutus_data = r.take_deferred_opt(4)?;
        let redeemers = r.take_deferred_opt(5)?;
        Ok(Self {
            shelley: ShelleyTransactionWitnessSet::from_record(r)?,
            plutus_scripts,
            plutus_data,
            redeemers,
        })
    }
}

/// Block layout shared by Alonzo and Babbage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlonzoBlock<
    H = ShelleyBlockHeader,
    B = AlonzoTransactionBody,
    W = AlonzoTransactionWitnessSet,
> {
    pub header: H,
    pub transaction_bodies: Vec<B>,
    pub transaction_witness_sets: Vec<W>,
    pub transaction_metadata_set: BTreeMap<u64, DeferredValue>,
    pub invalid_transactions: Vec<u64>,
}

impl<H: FromHeaderRecord, B: FromRecord, W: FromRecord> AlonzoBlock<H, B, W> {
    pub(crate) fn from_parts(mut r: Record, raw: RawHeader) -> Result<Self, DecodeError> {
        let header = H::from_header_record(r.take_record(0)?, raw)?;
        let transaction_bodies = r.take_list_of(1)?;
        let transaction_witness_sets = r.take_list_of(2)?;
        let transaction_metadata_set = take_metadata_set(&mut r, 3)?;
        let invalid_transactions = r.take_list_with(4, Value::into_uint)?;

        let count = transaction_bodies.len();
        check_aligned(count, transaction_witness_sets.len())?;
        check_indices("metadata", transaction_metadata_set.keys(), count)?;
        check_indices("invalid transaction", &invalid_transactions, count)?;

        Ok(Self {
            header,
            transaction_bodies,
            transaction_witness_sets,
            transaction_metadata_set,
            invalid_transactions,
        })
    }
}

impl<H, B, W> AlonzoBlock<H, B, W> {
    pub fn transaction_count(&self) -> usize {
        self.transaction_bodies.len()
    }

    /// Whether the transaction at `index` carries a true validity flag.
    pub fn is_transaction_valid(&self, index: usize) -> bool {
        !self.invalid_transactions.contains(&(index as u64))
    }
}

impl<B, W> AlonzoBlock<ShelleyBlockHeader, B, W> {
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

/// Transaction layout shared by Alonzo and Babbage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlonzoTransaction<B = AlonzoTransactionBody, W = AlonzoTransactionWitnessSet> {
    pub body: B,
    pub witness_set: W,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_data: Option<DeferredValue>,
}

impl<B: FromRecord, W: FromRecord> FromRecord for AlonzoTransaction<B, W> {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            body: r.take_typed(0)?,
            witness_set: r.take_typed(1)?,
            is_valid: r.take_bool(2)?,
            auxiliary_data: r.take_deferred_opt(3)?,
        })
    }
}

pub(crate) fn decode_block_with<H: FromHeaderRecord, B: FromRecord, W: FromRecord>(
    schema: &RecordSchema,
    data: &[u8],
) -> Result<AlonzoBlock<H, B, W>, LedgerError> {
    let (record, _) = engine::decode(schema, data)?;
    let raw = RawHeader::from_block(data, HeaderPrefix::None)?;
    Ok(AlonzoBlock::from_parts(record, raw)?)
}

pub fn decode_block(data: &[u8]) -> Result<AlonzoBlock, LedgerError> {
    decode_block_with(&BLOCK, data)
}

pub fn decode_transaction_body(data: &[u8]) -> Result<AlonzoTransactionBody, DecodeError> {
    engine::decode_as(&TRANSACTION_BODY, data).map(|(body, _)| body)
}

pub fn decode_transaction(data: &[u8]) -> Result<AlonzoTransaction, DecodeError> {
    engine::decode_as(&TRANSACTION, data).map(|(tx, _)| tx)
}
