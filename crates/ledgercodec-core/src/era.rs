//! The era registry: a fixed, ordered table mapping the three numeric tag
//! spaces (block type, block-header type, transaction type) to eras.
//!
//! The table is a `const` and has no mutation API, so it can be shared
//! across threads without synchronisation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A protocol era. Ordered by protocol history; the discriminant is the
/// era id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    Byron = 0,
    Shelley = 1,
    Allegra = 2,
    Mary = 3,
    Alonzo = 4,
    Babbage = 5,
}

impl Era {
    pub const ALL: [Era; 6] = [
        Era::Byron,
        Era::Shelley,
        Era::Allegra,
        Era::Mary,
        Era::Alonzo,
        Era::Babbage,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> &'static EraDescriptor {
        &ERAS[self as usize]
    }

    /// The era that follows this one, if any.
    pub fn next(self) -> Option<Era> {
        Era::ALL.get(self as usize + 1).copied()
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EraDescriptor {
    pub era: Era,
    pub id: u8,
    pub name: &'static str,
    /// Byron owns two block types (epoch boundary and main).
    pub block_types: &'static [u8],
    pub block_header_type: u8,
    pub transaction_type: u8,
}

pub const ERAS: [EraDescriptor; 6] = [
    EraDescriptor {
        era: Era::Byron,
        id: 0,
        name: "Byron",
        block_types: &[0, 1],
        block_header_type: 0,
        transaction_type: 0,
    },
    EraDescriptor {
        era: Era::Shelley,
        id: 1,
        name: "Shelley",
        block_types: &[2],
        block_header_type: 1,
        transaction_type: 1,
    },
    EraDescriptor {
        era: Era::Allegra,
        id: 2,
        name: "Allegra",
        block_types: &[3],
        block_header_type: 2,
        transaction_type: 2,
    },
    EraDescriptor {
        era: Era::Mary,
        id: 3,
        name: "Mary",
        block_types: &[4],
        block_header_type: 3,
        transaction_type: 3,
    },
    EraDescriptor {
        era: Era::Alonzo,
        id: 4,
        name: "Alonzo",
        block_types: &[5],
        block_header_type: 4,
        transaction_type: 4,
    },
    EraDescriptor {
        era: Era::Babbage,
        id: 5,
        name: "Babbage",
        block_types: &[6],
        block_header_type: 5,
        transaction_type: 5,
    },
];

pub fn era_by_id(id: u64) -> Option<Era> {
    ERAS.iter().find(|d| u64::from(d.id) == id).map(|d| d.era)
}

pub fn era_by_block_type(tag: u64) -> Option<Era> {
    ERAS
        .iter()
        .find(|d| d.block_types.iter().any(|t| u64::from(*t) == tag))
        .map(|d| d.era)
}

pub fn era_by_block_header_type(tag: u64) -> Option<Era> {
    ERAS
        .iter()
        .find(|d| u64::from(d.block_header_type) == tag)
        .map(|d| d.era)
}

pub fn era_by_transaction_type(tag: u64) -> Option<Era> {
    ERAS
        .iter()
        .find(|d| u64::from(d.transaction_type) == tag)
        .map(|d| d.era)
}

/// The block-type tag space. Byron is split into its two sub-kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    ByronEpochBoundary = 0,
    ByronMain = 1,
    Shelley = 2,
    Allegra = 3,
    Mary = 4,
    Alonzo = 5,
    Babbage = 6,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::ByronEpochBoundary,
        BlockType::ByronMain,
        BlockType::Shelley,
        BlockType::Allegra,
        BlockType::Mary,
        BlockType::Alonzo,
        BlockType::Babbage,
    ];

    pub fn from_tag(tag: u64) -> Option<BlockType> {
        BlockType::ALL.iter().copied().find(|t| *t as u64 == tag)
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn era(self) -> Era {
        match self {
            BlockType::ByronEpochBoundary | BlockType::ByronMain => Era::Byron,
            BlockType::Shelley => Era::Shelley,
            BlockType::Allegra => Era::Allegra,
            BlockType::Mary => Era::Mary,
            BlockType::Alonzo => Era::Alonzo,
            BlockType::Babbage => Era::Babbage,
        }
    }
}
