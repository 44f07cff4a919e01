//! Allegra: Shelley plus a validity-interval start on transaction bodies.

use ledgercodec_core::engine;
use ledgercodec_core::{DecodeError, FieldType, FromRecord, LedgerError, Record, RecordSchema};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

use crate::shelley::{self, ShelleyBlock, ShelleyTransaction, ShelleyTransactionBody};

pub static TRANSACTION_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&shelley::TRANSACTION_BODY, "AllegraTransactionBody")
        .optional(8, "validity_interval_start", FieldType::Uint)
        .build()
});

pub static BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&shelley::BLOCK, "AllegraBlock")
        .loosen(1, FieldType::list(FieldType::record(&TRANSACTION_BODY)))
        .build()
});

pub static TRANSACTION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&shelley::TRANSACTION, "AllegraTransaction")
        .loosen(0, FieldType::record(&TRANSACTION_BODY))
        .build()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllegraTransactionBody {
    #[serde(flatten)]
    pub shelley: ShelleyTransactionBody,
    pub validity_interval_start: u64,
}

impl Deref for AllegraTransactionBody {
    type Target = ShelleyTransactionBody;

    fn deref(&self) -> &Self::Target {
        &self.shelley
    }
}

impl FromRecord for AllegraTransactionBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let validity_interval_start = r.take_uint(8)?;
        Ok(Self {
            shelley: ShelleyTransactionBody::from_record(r)?,
            validity_interval_start,
        })
    }
}

pub type AllegraBlock = ShelleyBlock<AllegraTransactionBody>;
pub type AllegraTransaction = ShelleyTransaction<AllegraTransactionBody>;

pub fn decode_block(data: &[u8]) -> Result<AllegraBlock, LedgerError> {
    shelley::decode_block_with(&BLOCK, data)
}

pub fn decode_transaction_body(data: &[u8]) -> Result<AllegraTransactionBody, DecodeError> {
    engine::decode_as(&TRANSACTION_BODY, data).map(|(body, _)| body)
}

pub fn decode_transaction(data: &[u8]) -> Result<AllegraTransaction, DecodeError> {
    engine::decode_as(&TRANSACTION, data).map(|(tx, _)| tx)
}
