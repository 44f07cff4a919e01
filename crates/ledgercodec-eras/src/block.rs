//! Tag-dispatched block and header decoding.
//!
//! Callers hold a numeric type tag from an outer envelope (block type for
//! full blocks, block-header type for chain-sync header messages) and the
//! raw bytes. An unknown tag is reported as
//! [`LedgerError::UnknownTypeTag`], never a panic.

use ledgercodec_core::era::era_by_block_header_type;
use ledgercodec_core::{Blake2b256, BlockType, Era, LedgerError, TagSpace};
use serde::Serialize;

use crate::allegra::{self, AllegraBlock};
use crate::alonzo::{self, AlonzoBlock};
use crate::babbage::{self, BabbageBlock, BabbageBlockHeader};
use crate::byron::{
    self, ByronEpochBoundaryBlock, ByronEpochBoundaryBlockHeader, ByronMainBlock,
    ByronMainBlockHeader,
};
use crate::mary::{self, MaryBlock};
use crate::shelley::{self, ShelleyBlock, ShelleyBlockHeader};

/// A decoded block of any era.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "block", rename_all = "snake_case")]
pub enum Block {
    ByronEpochBoundary(ByronEpochBoundaryBlock),
    ByronMain(ByronMainBlock),
    Shelley(ShelleyBlock),
    Allegra(AllegraBlock),
    Mary(MaryBlock),
    Alonzo(AlonzoBlock),
    Babbage(BabbageBlock),
}

/// A decoded block header of any era. Shelley through Alonzo share one
/// header shape; the variant records which era it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "header", rename_all = "snake_case")]
pub enum BlockHeader {
    ByronEpochBoundary(ByronEpochBoundaryBlockHeader),
    ByronMain(ByronMainBlockHeader),
    Shelley(ShelleyBlockHeader),
    Allegra(ShelleyBlockHeader),
    Mary(ShelleyBlockHeader),
    Alonzo(ShelleyBlockHeader),
    Babbage(BabbageBlockHeader),
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::ByronEpochBoundary(_) => BlockType::ByronEpochBoundary,
            Block::ByronMain(_) => BlockType::ByronMain,
            Block::Shelley(_) => BlockType::Shelley,
            Block::Allegra(_) => BlockType::Allegra,
            Block::Mary(_) => BlockType::Mary,
            Block::Alonzo(_) => BlockType::Alonzo,
            Block::Babbage(_) => BlockType::Babbage,
        }
    }

    pub fn era(&self) -> Era {
        self.block_type().era()
    }

    pub fn id(&self) -> Blake2b256 {
        match self {
            Block::ByronEpochBoundary(b) => b.header.id(),
            Block::ByronMain(b) => b.header.id(),
            Block::Shelley(b) => b.header.id(),
            Block::Allegra(b) => b.header.id(),
            Block::Mary(b) => b.header.id(),
            Block::Alonzo(b) => b.header.id(),
            Block::Babbage(b) => b.header.id(),
        }
    }

    pub fn id_hex(&self) -> String {
        self.id().to_hex()
    }

    pub fn block_number(&self) -> u64 {
        match self {
            Block::ByronEpochBoundary(b) => b.header.block_number(),
            Block::ByronMain(b) => b.header.block_number(),
            Block::Shelley(b) => b.block_number(),
            Block::Allegra(b) => b.block_number(),
            Block::Mary(b) => b.block_number(),
            Block::Alonzo(b) => b.block_number(),
            Block::Babbage(b) => b.block_number(),
        }
    }

    pub fn slot_number(&self) -> u64 {
        match self {
            Block::ByronEpochBoundary(b) => b.header.slot_number(),
            Block::ByronMain(b) => b.header.slot_number(),
            Block::Shelley(b) => b.slot_number(),
            Block::Allegra(b) => b.slot_number(),
            Block::Mary(b) => b.slot_number(),
            Block::Alonzo(b) => b.slot_number(),
            Block::Babbage(b) => b.slot_number(),
        }
    }

    pub fn prev_hash(&self) -> Option<Blake2b256> {
        match self {
            Block::ByronEpochBoundary(b) => b.header.prev_hash(),
            Block::ByronMain(b) => b.header.prev_hash(),
            Block::Shelley(b) => b.header.prev_hash(),
            Block::Allegra(b) => b.header.prev_hash(),
            Block::Mary(b) => b.header.prev_hash(),
            Block::Alonzo(b) => b.header.prev_hash(),
            Block::Babbage(b) => b.header.prev_hash(),
        }
    }

    pub fn transaction_count(&self) -> usize {
        match self {
            Block::ByronEpochBoundary(_) => 0,
            Block::ByronMain(b) => b.transaction_count(),
            Block::Shelley(b) => b.transaction_count(),
            Block::Allegra(b) => b.transaction_count(),
            Block::Mary(b) => b.transaction_count(),
            Block::Alonzo(b) => b.transaction_count(),
            Block::Babbage(b) => b.transaction_count(),
        }
    }

    pub fn into_header(self) -> BlockHeader {
        match self {
            Block::ByronEpochBoundary(b) => BlockHeader::ByronEpochBoundary(b.header),
            Block::ByronMain(b) => BlockHeader::ByronMain(b.header),
            Block::Shelley(b) => BlockHeader::Shelley(b.header),
            Block::Allegra(b) => BlockHeader::Allegra(b.header),
            Block::Mary(b) => BlockHeader::Mary(b.header),
            Block::Alonzo(b) => BlockHeader::Alonzo(b.header),
            Block::Babbage(b) => BlockHeader::Babbage(b.header),
        }
    }
}

impl BlockHeader {
    pub fn era(&self) -> Era {
        match self {
            BlockHeader::ByronEpochBoundary(_) | BlockHeader::ByronMain(_) => Era::Byron,
            BlockHeader::Shelley(_) => Era::Shelley,
            BlockHeader::Allegra(_) => Era::Allegra,
            BlockHeader::Mary(_) => Era::Mary,
            BlockHeader::Alonzo(_) => Era::Alonzo,
            BlockHeader::Babbage(_) => Era::Babbage,
        }
    }

    pub fn id(&self) -> Blake2b256 {
        match self {
            BlockHeader::ByronEpochBoundary(h) => h.id(),
            BlockHeader::ByronMain(h) => h.id(),
            BlockHeader::Shelley(h)
            | BlockHeader::Allegra(h)
            | BlockHeader::Mary(h)
            | BlockHeader::Alonzo(h) => h.id(),
            BlockHeader::Babbage(h) => h.id(),
        }
    }

    pub fn id_hex(&self) -> String {
        self.id().to_hex()
    }

    pub fn block_number(&self) -> u64 {
        match self {
            BlockHeader::ByronEpochBoundary(h) => h.block_number(),
            BlockHeader::ByronMain(h) => h.block_number(),
            BlockHeader::Shelley(h)
            | BlockHeader::Allegra(h)
            | BlockHeader::Mary(h)
            | BlockHeader::Alonzo(h) => h.block_number(),
            BlockHeader::Babbage(h) => h.block_number(),
        }
    }

    pub fn slot_number(&self) -> u64 {
        match self {
            BlockHeader::ByronEpochBoundary(h) => h.slot_number(),
            BlockHeader::ByronMain(h) => h.slot_number(),
            BlockHeader::Shelley(h)
            | BlockHeader::Allegra(h)
            | BlockHeader::Mary(h)
            | BlockHeader::Alonzo(h) => h.slot_number(),
            BlockHeader::Babbage(h) => h.slot_number(),
        }
    }

    pub fn prev_hash(&self) -> Option<Blake2b256> {
        match self {
            BlockHeader::ByronEpochBoundary(h) => h.prev_hash(),
            BlockHeader::ByronMain(h) => h.prev_hash(),
            BlockHeader::Shelley(h)
            | BlockHeader::Allegra(h)
            | BlockHeader::Mary(h)
            | BlockHeader::Alonzo(h) => h.prev_hash(),
            BlockHeader::Babbage(h) => h.prev_hash(),
        }
    }
}

fn unknown(space: TagSpace, tag: u64) -> LedgerError {
    LedgerError::UnknownTypeTag { space, tag }
}

/// Decode a full block by its block-type tag.
pub fn decode_block(block_type: u64, data: &[u8]) -> Result<Block, LedgerError> {
    let block_type =
        BlockType::from_tag(block_type).ok_or_else(|| unknown(TagSpace::BlockType, block_type))?;
    Ok(match block_type {
        BlockType::ByronEpochBoundary => {
            Block::ByronEpochBoundary(byron::decode_epoch_boundary_block(data)?)
        }
        BlockType::ByronMain => Block::ByronMain(byron::decode_main_block(data)?),
        BlockType::Shelley => Block::Shelley(shelley::decode_block(data)?),
        BlockType::Allegra => Block::Allegra(allegra::decode_block(data)?),
        BlockType::Mary => Block::Mary(mary::decode_block(data)?),
        BlockType::Alonzo => Block::Alonzo(alonzo::decode_block(data)?),
        BlockType::Babbage => Block::Babbage(babbage::decode_block(data)?),
    })
}

/// Decode a standalone header keyed by the block-type tag. Shelley
/// through Alonzo all route to the shared header schema.
pub fn decode_block_header(block_type: u64, data: &[u8]) -> Result<BlockHeader, LedgerError> {
    let block_type =
        BlockType::from_tag(block_type).ok_or_else(|| unknown(TagSpace::BlockType, block_type))?;
    Ok(match block_type {
        BlockType::ByronEpochBoundary => {
            BlockHeader::ByronEpochBoundary(byron::decode_epoch_boundary_block_header(data)?)
        }
        BlockType::ByronMain => BlockHeader::ByronMain(byron::decode_main_block_header(data)?),
        BlockType::Shelley => BlockHeader::Shelley(shelley::decode_block_header(data)?),
        BlockType::Allegra => BlockHeader::Allegra(shelley::decode_block_header(data)?),
        BlockType::Mary => BlockHeader::Mary(shelley::decode_block_header(data)?),
        BlockType::Alonzo => BlockHeader::Alonzo(shelley::decode_block_header(data)?),
        BlockType::Babbage => BlockHeader::Babbage(babbage::decode_block_header(data)?),
    })
}

/// Decode a header keyed by the block-header-type tag, as carried by
/// chain-sync header messages. Header type 0 (Byron) additionally needs
/// the sub-kind tag: 0 for epoch-boundary, 1 for main.
pub fn decode_header_content(
    header_type: u64,
    byron_subtag: Option<u8>,
    data: &[u8],
) -> Result<BlockHeader, LedgerError> {
    let era = era_by_block_header_type(header_type)
        .ok_or_else(|| unknown(TagSpace::BlockHeaderType, header_type))?;
    let block_type = match era {
        Era::Byron => match byron_subtag {
            Some(0) => BlockType::ByronEpochBoundary,
            Some(1) => BlockType::ByronMain,
            other => {
                return Err(unknown(
                    TagSpace::BlockHeaderType,
                    other.map_or(header_type, u64::from),
                ))
            }
        },
        Era::Shelley => BlockType::Shelley,
        Era::Allegra => BlockType::Allegra,
        Era::Mary => BlockType::Mary,
        Era::Alonzo => BlockType::Alonzo,
        Era::Babbage => BlockType::Babbage,
    };
    decode_block_header(u64::from(block_type.tag()), data)
}
