//! Per-era schema lookup, used for introspection and composition checks.

use ledgercodec_core::{Era, RecordSchema};
use std::sync::Arc;

use crate::{allegra, alonzo, babbage, byron, mary, shelley};

/// The top-level schemas of one era.
#[derive(Debug, Clone)]
pub struct EraSchemas {
    pub era: Era,
    /// Byron main block header for Byron.
    pub block_header: Arc<RecordSchema>,
    /// Byron main block for Byron.
    pub block: Arc<RecordSchema>,
    /// `None` for Byron, whose bodies stay opaque.
    pub transaction_body: Option<Arc<RecordSchema>>,
    pub transaction_witness_set: Option<Arc<RecordSchema>>,
    pub transaction: Option<Arc<RecordSchema>>,
}

impl EraSchemas {
    pub fn for_era(era: Era) -> Self {
        match era {
            Era::Byron => Self {
                era,
                block_header: byron::MAIN_BLOCK_HEADER.clone(),
                block: byron::MAIN_BLOCK.clone(),
                transaction_body: None,
                transaction_witness_set: None,
                transaction: None,
            },
            Era::Shelley => Self {
                era,
                block_header: shelley::BLOCK_HEADER.clone(),
                block: shelley::BLOCK.clone(),
                transaction_body: Some(shelley::TRANSACTION_BODY.clone()),
                transaction_witness_set: Some(shelley::TRANSACTION_WITNESS_SET.clone()),
                transaction: Some(shelley::TRANSACTION.clone()),
            },
            Era::Allegra => Self {
                era,
                block_header: shelley::BLOCK_HEADER.clone(),
                block: allegra::BLOCK.clone(),
                transaction_body: Some(allegra::TRANSACTION_BODY.clone()),
                transaction_witness_set: Some(shelley::TRANSACTION_WITNESS_SET.clone()),
                transaction: Some(allegra::TRANSACTION.clone()),
            },
            Era::Mary => Self {
                era,
                block_header: shelley::BLOCK_HEADER.clone(),
                block: mary::BLOCK.clone(),
                transaction_body: Some(mary::TRANSACTION_BODY.clone()),
                transaction_witness_set: Some(shelley::TRANSACTION_WITNESS_SET.clone()),
                transaction: Some(mary::TRANSACTION.clone()),
            },
            Era::Alonzo => Self {
                era,
                block_header: shelley::BLOCK_HEADER.clone(),
                block: alonzo::BLOCK.clone(),
                transaction_body: Some(alonzo::TRANSACTION_BODY.clone()),
                transaction_witness_set: Some(alonzo::TRANSACTION_WITNESS_SET.clone()),
                transaction: Some(alonzo::TRANSACTION.clone()),
            },
            Era::Babbage => Self {
                era,
                block_header: babbage::BLOCK_HEADER.clone(),
                block: babbage::BLOCK.clone(),
                transaction_body: Some(babbage::TRANSACTION_BODY.clone()),
                transaction_witness_set: Some(babbage::TRANSACTION_WITNESS_SET.clone()),
                transaction: Some(babbage::TRANSACTION.clone()),
            },
        }
    }

    pub fn all() -> Vec<EraSchemas> {
        Era::ALL.iter().map(|era| Self::for_era(*era)).collect()
    }

    /// Every schema reachable from the era tables, including sub-records.
    pub fn every_schema() -> Vec<Arc<RecordSchema>> {
        vec![
            crate::common::TRANSACTION_INPUT.clone(),
            crate::common::PROTOCOL_PARAMETER_UPDATE.clone(),
            crate::common::MULTIASSET_AMOUNT.clone(),
            crate::common::OPERATIONAL_CERT.clone(),
            crate::common::PROTOCOL_VERSION.clone(),
            byron::SLOT_ID.clone(),
            byron::DIFFICULTY.clone(),
            byron::BLOCK_VERSION.clone(),
            byron::SOFTWARE_VERSION.clone(),
            byron::MAIN_CONSENSUS_DATA.clone(),
            byron::MAIN_EXTRA_DATA.clone(),
            byron::MAIN_BLOCK_HEADER.clone(),
            byron::MAIN_BLOCK_BODY.clone(),
            byron::MAIN_BLOCK.clone(),
            byron::EBB_CONSENSUS_DATA.clone(),
            byron::EBB_BLOCK_HEADER.clone(),
            byron::EBB_BLOCK.clone(),
            shelley::TRANSACTION_OUTPUT.clone(),
            shelley::TRANSACTION_BODY.clone(),
            shelley::TRANSACTION_WITNESS_SET.clone(),
            shelley::HEADER_BODY.clone(),
            shelley::BLOCK_HEADER.clone(),
            shelley::BLOCK.clone(),
            shelley::TRANSACTION.clone(),
            allegra::TRANSACTION_BODY.clone(),
            allegra::BLOCK.clone(),
            allegra::TRANSACTION.clone(),
            mary::TRANSACTION_OUTPUT.clone(),
            mary::TRANSACTION_BODY.clone(),
            mary::BLOCK.clone(),
            mary::TRANSACTION.clone(),
            alonzo::TRANSACTION_OUTPUT.clone(),
            alonzo::TRANSACTION_BODY.clone(),
            alonzo::TRANSACTION_WITNESS_SET.clone(),
            alonzo::BLOCK.clone(),
            alonzo::TRANSACTION.clone(),
            babbage::TRANSACTION_OUTPUT_MAP.clone(),
            babbage::TRANSACTION_BODY.clone(),
            babbage::TRANSACTION_WITNESS_SET.clone(),
            babbage::HEADER_BODY.clone(),
            babbage::BLOCK_HEADER.clone(),
            babbage::BLOCK.clone(),
            babbage::TRANSACTION.clone(),
        ]
    }
}
