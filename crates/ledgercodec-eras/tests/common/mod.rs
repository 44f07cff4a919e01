//! Minimal, structurally valid encodings for every era, built with
//! `minicbor::Encoder`.

#![allow(dead_code)]

use minicbor::{encode, Encoder};
use std::convert::Infallible;

pub type Enc = Encoder<Vec<u8>>;
pub type EncResult = Result<(), encode::Error<Infallible>>;

pub const PREV_HASH: [u8; 32] = [0x11; 32];
pub const TX_ID: [u8; 32] = [0xa1; 32];
pub const ADDRESS: [u8; 29] = [0x61; 29];

pub fn cbor(build: impl FnOnce(&mut Enc) -> EncResult) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new());
    build(&mut e).unwrap();
    e.into_writer()
}

/// Shape of the post-Byron block being built.
#[derive(Debug, Clone)]
pub struct BlockSpec {
    pub babbage_header: bool,
    pub block_number: u64,
    pub slot: u64,
    pub bodies: usize,
    pub witness_sets: usize,
    pub metadata: Vec<u64>,
    /// `Some` for Alonzo and later.
    pub invalid: Option<Vec<u64>>,
}

impl BlockSpec {
    pub fn shelley(bodies: usize) -> Self {
        Self {
            babbage_header: false,
            block_number: 1_000,
            slot: 10_000,
            bodies,
            witness_sets: bodies,
            metadata: Vec::new(),
            invalid: None,
        }
    }

    pub fn alonzo(bodies: usize) -> Self {
        Self {
            invalid: Some(Vec::new()),
            ..Self::shelley(bodies)
        }
    }

    pub fn babbage(bodies: usize) -> Self {
        Self {
            babbage_header: true,
            ..Self::alonzo(bodies)
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        cbor(|e| encode_block(e, self))
    }
}

pub fn shelley_header(e: &mut Enc, block_number: u64, slot: u64) -> EncResult {
    e.array(2)?;
    e.array(15)?
        .u64(block_number)?
        .u64(slot)?
        .bytes(&PREV_HASH)?
        .bytes(&[0x22; 32])?
        .bytes(&[0x33; 32])?;
    e.array(2)?.bytes(&[0x44; 32])?.bytes(&[0x55; 80])?;
    e.array(2)?.bytes(&[0x66; 32])?.bytes(&[0x77; 80])?;
    e.u64(1024)?
        .bytes(&[0x88; 32])?
        .bytes(&[0x99; 32])?
        .u64(3)?
        .u64(120)?
        .bytes(&[0xaa; 64])?
        .u64(2)?
        .u64(0)?;
    e.bytes(&[0xbb; 448])?;
    Ok(())
}

pub fn babbage_header(e: &mut Enc, block_number: u64, slot: u64) -> EncResult {
    e.array(2)?;
    e.array(10)?
        .u64(block_number)?
        .u64(slot)?
        .bytes(&PREV_HASH)?
        .bytes(&[0x22; 32])?
        .bytes(&[0x33; 32])?;
    e.array(2)?.bytes(&[0x44; 32])?.bytes(&[0x55; 80])?;
    e.u64(2048)?.bytes(&[0x88; 32])?;
    e.array(4)?
        .bytes(&[0x99; 32])?
        .u64(7)?
        .u64(300)?
        .bytes(&[0xaa; 64])?;
    e.array(2)?.u64(7)?.u64(0)?;
    e.bytes(&[0xbb; 448])?;
    Ok(())
}

/// Shelley-layout body: inputs, one legacy output, fee, ttl.
pub fn shelley_body(e: &mut Enc, fee: u64) -> EncResult {
    e.map(4)?;
    e.u8(0)?.array(1)?.array(2)?.bytes(&TX_ID)?.u8(0)?;
    e.u8(1)?.array(1)?.array(2)?.bytes(&ADDRESS)?.u64(1_000_000)?;
    e.u8(2)?.u64(fee)?;
    e.u8(3)?.u64(5_000_000)?;
    Ok(())
}

pub fn witness_set(e: &mut Enc) -> EncResult {
    e.map(1)?;
    e.u8(0)?.array(1)?.array(2)?.bytes(&[0xcc; 32])?.bytes(&[0xdd; 64])?;
    Ok(())
}

pub fn encode_block(e: &mut Enc, spec: &BlockSpec) -> EncResult {
    e.array(if spec.invalid.is_some() { 5 } else { 4 })?;
    if spec.babbage_header {
        babbage_header(e, spec.block_number, spec.slot)?;
    } else {
        shelley_header(e, spec.block_number, spec.slot)?;
    }
    e.array(spec.bodies as u64)?;
    for i in 0..spec.bodies {
        shelley_body(e, 170_000 + i as u64)?;
    }
    e.array(spec.witness_sets as u64)?;
    for _ in 0..spec.witness_sets {
        witness_set(e)?;
    }
    e.map(spec.metadata.len() as u64)?;
    for k in &spec.metadata {
        e.u64(*k)?.map(1)?.u16(674)?.str("memo")?;
    }
    if let Some(invalid) = &spec.invalid {
        e.array(invalid.len() as u64)?;
        for i in invalid {
            e.u64(*i)?;
        }
    }
    Ok(())
}

pub fn byron_main_header(e: &mut Enc, epoch: u64, slot: u64) -> EncResult {
    e.array(5)?.u32(764_824_073)?.bytes(&PREV_HASH)?;
    // body proof
    e.array(4)?.u8(0)?.bytes(&[0x01; 32])?.bytes(&[0x02; 32])?.bytes(&[0x03; 32])?;
    // consensus data
    e.array(4)?;
    e.array(2)?.u64(epoch)?.u64(slot)?;
    e.bytes(&[0x04; 64])?;
    e.array(1)?.u64(1_234_567)?;
    e.array(2)?.u8(0)?.bytes(&[0x05; 64])?;
    // extra data
    e.array(4)?;
    e.array(3)?.u8(0)?.u8(2)?.u8(0)?;
    e.array(2)?.str("cardano-sl")?.u8(1)?;
    e.map(0)?;
    e.bytes(&[0x06; 32])?;
    Ok(())
}

pub fn byron_main_block(e: &mut Enc, txs: usize) -> EncResult {
    e.array(3)?;
    byron_main_header(e, 4, 21_599)?;
    e.array(4)?;
    e.array(txs as u64)?;
    for i in 0..txs {
        e.array(2)?.array(1)?.u64(i as u64)?.array(0)?;
    }
    e.array(2)?.u8(3)?.map(0)?;
    e.array(0)?;
    e.array(2)?.array(0)?.array(0)?;
    e.array(1)?.map(0)?;
    Ok(())
}

pub fn byron_ebb_header(e: &mut Enc, epoch: u64) -> EncResult {
    e.array(5)?.u32(764_824_073)?.bytes(&PREV_HASH)?.bytes(&[0x07; 32])?;
    e.array(2)?.u64(epoch)?.array(1)?.u64(1_234_567)?;
    e.array(1)?.map(0)?;
    Ok(())
}

pub fn byron_ebb_block(e: &mut Enc, stakeholders: usize) -> EncResult {
    e.array(3)?;
    byron_ebb_header(e, 5)?;
    e.array(stakeholders as u64)?;
    for i in 0..stakeholders {
        e.bytes(&[i as u8; 28])?;
    }
    e.array(1)?.map(0)?;
    Ok(())
}

/// `[body, witness set, metadata]` or, with `is_valid`, the Alonzo layout.
pub fn transaction(e: &mut Enc, is_valid: Option<bool>) -> EncResult {
    e.array(if is_valid.is_some() { 4 } else { 3 })?;
    shelley_body(e, 180_000)?;
    witness_set(e)?;
    if let Some(v) = is_valid {
        e.bool(v)?;
    }
    e.null()?;
    Ok(())
}
