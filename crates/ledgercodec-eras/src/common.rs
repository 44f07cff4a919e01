//! Sub-records shared by every post-Byron era.

use ledgercodec_core::{
    Blake2b256, DecodeError, DeferredValue, FieldType, FromRecord, OpaqueValue, RawHeader,
    Record, RecordSchema, Value, WireShape,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;

pub static TRANSACTION_INPUT: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("TransactionInput")
        .field(0, "id", FieldType::Hash32)
        .field(1, "index", FieldType::Uint)
        .build()
});

pub static PROTOCOL_PARAMETER_UPDATE: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ProtocolParameterUpdate")
        .field(0, "proposals", FieldType::Deferred)
        .field(1, "epoch", FieldType::Uint)
        .build()
});

/// `[coin, multiasset]`. The multiasset map is keyed by policy-id bytes.
pub static MULTIASSET_AMOUNT: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("MultiassetAmount")
        .field(0, "coin", FieldType::Uint)
        .field(1, "assets", FieldType::Deferred)
        .build()
});

pub static OPERATIONAL_CERT: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("OperationalCert")
        .field(0, "hot_vkey", FieldType::Opaque)
        .field(1, "sequence_number", FieldType::Uint)
        .field(2, "kes_period", FieldType::Uint)
        .field(3, "signature", FieldType::Opaque)
        .build()
});

pub static PROTOCOL_VERSION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::array("ProtocolVersion")
        .field(0, "major", FieldType::Uint)
        .field(1, "minor", FieldType::Uint)
        .build()
});

/// Builds a typed header from its decoded record and captured encoding.
pub trait FromHeaderRecord: Sized {
    fn from_header_record(record: Record, raw: RawHeader) -> Result<Self, DecodeError>;
}

/// Coin, or coin plus a multiasset bundle.
pub fn amount_type() -> FieldType {
    FieldType::Choice(vec![FieldType::Uint, FieldType::record(&MULTIASSET_AMOUNT)])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionInput {
    pub id: Blake2b256,
    pub index: u32,
}

impl FromRecord for TransactionInput {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            id: r.take_hash32(0)?,
            index: r.take_uint_as(1)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    Coin(u64),
    Multiasset { coin: u64, assets: DeferredValue },
}

impl Amount {
    pub fn coin(&self) -> u64 {
        match self {
            Amount::Coin(c) => *c,
            Amount::Multiasset { coin, .. } => *coin,
        }
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Uint(c) => Ok(Amount::Coin(c)),
            Value::Record(mut r) => Ok(Amount::Multiasset {
                coin: r.take_uint(0)?,
                assets: r.take_deferred(1)?,
            }),
            Value::Absent => Ok(Amount::Coin(0)),
            other => Err(DecodeError::UnexpectedType {
                expected: "coin or multiasset".into(),
                found: other.kind().into(),
            }),
        }
    }
}

/// Wire layout an output was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `[address, amount, ?datum_hash]`
    Legacy,
    /// `{0: address, 1: amount, ?2: datum_option, ?3: script_ref}`
    PostAlonzo,
}

/// A transaction output of any post-Byron era.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionOutput {
    pub format: OutputFormat,
    #[serde(with = "hex")]
    pub address: Vec<u8>,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum_hash: Option<Blake2b256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum_option: Option<OpaqueValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_ref: Option<DeferredValue>,
}

impl FromRecord for TransactionOutput {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let address = r.take_bytes(0)?;
        let amount = Amount::from_value(r.take(1))?;
        match r.shape() {
            WireShape::Array => Ok(Self {
                format: OutputFormat::Legacy,
                address,
                amount,
                datum_hash: r.take_hash32_opt(2)?,
                datum_option: None,
                script_ref: None,
            }),
            WireShape::Map => Ok(Self {
                format: OutputFormat::PostAlonzo,
                address,
                amount,
                datum_hash: None,
                datum_option: r.take_opaque_opt(2)?,
                script_ref: r.take_deferred_opt(3)?,
            }),
        }
    }
}

/// Convert an output-typed field value.
pub(crate) fn output_from_value(value: Value) -> Result<TransactionOutput, DecodeError> {
    TransactionOutput::from_record(value.into_record()?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolParameterUpdate {
    pub proposals: DeferredValue,
    pub epoch: u64,
}

impl FromRecord for ProtocolParameterUpdate {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            proposals: r.take_deferred(0)?,
            epoch: r.take_uint(1)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalCert {
    pub hot_vkey: OpaqueValue,
    pub sequence_number: u32,
    pub kes_period: u32,
    pub signature: OpaqueValue,
}

impl FromRecord for OperationalCert {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            hot_vkey: r.take_opaque(0)?,
            sequence_number: r.take_uint_as(1)?,
            kes_period: r.take_uint_as(2)?,
            signature: r.take_opaque(3)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion {
    pub major: u64,
    pub minor: u64,
}

impl FromRecord for ProtocolVersion {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            major: r.take_uint(0)?,
            minor: r.take_uint(1)?,
        })
    }
}

/// Every index in `indices` must address one of `len` transactions.
pub(crate) fn check_indices<'a>(
    what: &str,
    indices: impl IntoIterator<Item = &'a u64>,
    len: usize,
) -> Result<(), DecodeError> {
    for &i in indices {
        if i >= len as u64 {
            return Err(DecodeError::Inconsistent {
                reason: format!("{what} index {i} out of range for {len} transactions"),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_aligned(bodies: usize, witness_sets: usize) -> Result<(), DecodeError> {
    if bodies != witness_sets {
        return Err(DecodeError::Inconsistent {
            reason: format!("{bodies} transaction bodies but {witness_sets} witness sets"),
        });
    }
    Ok(())
}
