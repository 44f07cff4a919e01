//! Tag-dispatched transaction and transaction-body decoding.

use ledgercodec_core::era::era_by_transaction_type;
use ledgercodec_core::{Era, LedgerError, TagSpace};
use serde::Serialize;

use crate::allegra::{self, AllegraTransaction, AllegraTransactionBody};
use crate::alonzo::{self, AlonzoTransaction, AlonzoTransactionBody};
use crate::babbage::{self, BabbageTransaction, BabbageTransactionBody};
use crate::byron::{self, ByronTransaction, ByronTransactionBody};
use crate::mary::{self, MaryTransaction, MaryTransactionBody};
use crate::shelley::{self, ShelleyTransaction, ShelleyTransactionBody};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "era", content = "transaction", rename_all = "lowercase")]
pub enum Transaction {
    Byron(ByronTransaction),
    Shelley(ShelleyTransaction),
    Allegra(AllegraTransaction),
    Mary(MaryTransaction),
    Alonzo(AlonzoTransaction),
    Babbage(BabbageTransaction),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "era", content = "body", rename_all = "lowercase")]
pub enum TransactionBody {
    Byron(ByronTransactionBody),
    Shelley(ShelleyTransactionBody),
    Allegra(AllegraTransactionBody),
    Mary(MaryTransactionBody),
    Alonzo(AlonzoTransactionBody),
    Babbage(BabbageTransactionBody),
}

impl Transaction {
    pub fn era(&self) -> Era {
        match self {
            Transaction::Byron(_) => Era::Byron,
            Transaction::Shelley(_) => Era::Shelley,
            Transaction::Allegra(_) => Era::Allegra,
            Transaction::Mary(_) => Era::Mary,
            Transaction::Alonzo(_) => Era::Alonzo,
            Transaction::Babbage(_) => Era::Babbage,
        }
    }

    /// `false` only for Alonzo-or-later transactions flagged invalid.
    pub fn is_valid(&self) -> bool {
        match self {
            Transaction::Alonzo(tx) => tx.is_valid,
            Transaction::Babbage(tx) => tx.is_valid,
            _ => true,
        }
    }
}

impl TransactionBody {
    pub fn era(&self) -> Era {
        match self {
            TransactionBody::Byron(_) => Era::Byron,
            TransactionBody::Shelley(_) => Era::Shelley,
            TransactionBody::Allegra(_) => Era::Allegra,
            TransactionBody::Mary(_) => Era::Mary,
            TransactionBody::Alonzo(_) => Era::Alonzo,
            TransactionBody::Babbage(_) => Era::Babbage,
        }
    }

    /// Fee in lovelace; Byron bodies carry none.
    pub fn fee(&self) -> Option<u64> {
        match self {
            TransactionBody::Byron(_) => None,
            TransactionBody::Shelley(b) => Some(b.fee),
            TransactionBody::Allegra(b) => Some(b.fee),
            TransactionBody::Mary(b) => Some(b.fee),
            TransactionBody::Alonzo(b) => Some(b.fee),
            TransactionBody::Babbage(b) => Some(b.fee),
        }
    }
}

fn era_for(tx_type: u64) -> Result<Era, LedgerError> {
    era_by_transaction_type(tx_type).ok_or(LedgerError::UnknownTypeTag {
        space: TagSpace::TransactionType,
        tag: tx_type,
    })
}

/// Decode a full transaction by its transaction-type tag.
pub fn decode_transaction(tx_type: u64, data: &[u8]) -> Result<Transaction, LedgerError> {
    Ok(match era_for(tx_type)? {
        Era::Byron => Transaction::Byron(byron::decode_transaction(data)?),
        Era::Shelley => Transaction::Shelley(shelley::decode_transaction(data)?),
        Era::Allegra => Transaction::Allegra(allegra::decode_transaction(data)?),
        Era::Mary => Transaction::Mary(mary::decode_transaction(data)?),
        Era::Alonzo => Transaction::Alonzo(alonzo::decode_transaction(data)?),
        Era::Babbage => Transaction::Babbage(babbage::decode_transaction(data)?),
    })
}

/// Decode a transaction body by its transaction-type tag.
pub fn decode_transaction_body(tx_type: u64, data: &[u8]) -> Result<TransactionBody, LedgerError> {
    Ok(match era_for(tx_type)? {
        Era::Byron => TransactionBody::Byron(byron::decode_transaction_body(data)?),
        Era::Shelley => TransactionBody::Shelley(shelley::decode_transaction_body(data)?),
        Era::Allegra => TransactionBody::Allegra(allegra::decode_transaction_body(data)?),
        Era::Mary => TransactionBody::Mary(mary::decode_transaction_body(data)?),
        Era::Alonzo => TransactionBody::Alonzo(alonzo::decode_transaction_body(data)?),
        Era::Babbage => TransactionBody::Babbage(babbage::decode_transaction_body(data)?),
    })
}
