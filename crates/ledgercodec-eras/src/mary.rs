//! Mary: multi-asset values. Output amounts loosen to coin-or-bundle and
//! transaction bodies gain a mint field.

use ledgercodec_core::engine;
use ledgercodec_core::{
    DecodeError, DeferredValue, FieldType, FromRecord, LedgerError, Record, RecordSchema,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

use crate::allegra::{self, AllegraTransactionBody};
use crate::common::amount_type;
use crate::shelley::{self, ShelleyBlock, ShelleyTransaction};

pub static TRANSACTION_OUTPUT: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&shelley::TRANSACTION_OUTPUT, "MaryTransactionOutput")
        .loosen(1, amount_type())
        .build()
});

pub static TRANSACTION_BODY: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&allegra::TRANSACTION_BODY, "MaryTransactionBody")
        .loosen(1, FieldType::list(FieldType::record(&TRANSACTION_OUTPUT)))
        .optional(9, "mint", FieldType::Deferred)
        .build()
});

pub static BLOCK: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&allegra::BLOCK, "MaryBlock")
        .loosen(1, FieldType::list(FieldType::record(&TRANSACTION_BODY)))
        .build()
});

pub static TRANSACTION: Lazy<Arc<RecordSchema>> = Lazy::new(|| {
    RecordSchema::extend(&allegra::TRANSACTION, "MaryTransaction")
        .loosen(0, FieldType::record(&TRANSACTION_BODY))
        .build()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaryTransactionBody {
    #[serde(flatten)]
    pub allegra: AllegraTransactionBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<DeferredValue>,
}

impl Deref for MaryTransactionBody {
    type Target = AllegraTransactionBody;

    fn deref(&self) -> &Self::Target {
        &self.allegra
    }
}

impl FromRecord for MaryTransactionBody {
    fn from_record(mut r: Record) -> Result<Self, DecodeError> {
        let mint = r.take_deferred_opt(9)?;
        Ok(Self {
            allegra: AllegraTransactionBody::from_record(r)?,
            mint,
        })
    }
}

pub type MaryBlock = ShelleyBlock<MaryTransactionBody>;
pub type MaryTransaction = ShelleyTransaction<MaryTransactionBody>;

pub fn decode_block(data: &[u8]) -> Result<MaryBlock, LedgerError> {
    shelley::decode_block_with(&BLOCK, data)
}

pub fn decode_transaction_body(data: &[u8]) -> Result<MaryTransactionBody, DecodeError> {
    engine::decode_as(&TRANSACTION_BODY, data).map(|(body, _)| body)
}

pub fn decode_transaction(data: &[u8]) -> Result<MaryTransaction, DecodeError> {
    engine::decode_as(&TRANSACTION, data).map(|(tx, _)| tx)
}
