//! Golden fixture integration tests.
//!
//! Each fixture in `fixtures/blocks/` holds one synthetic block encoding,
//! its block-type tag and the expected summary values. Header identifiers
//! in the fixtures were computed outside this crate with BLAKE2b-256 over
//! the header span (behind the Byron prefix where applicable), so these
//! tests check the decoder against an independent encoder and hasher, not
//! against published chain data.

use ledgercodec_core::Era;
use ledgercodec_eras::{decode_block, decode_block_header, Block};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    description: String,
    block_type: u64,
    cbor: String,
    expected_era: Era,
    expected_block_number: u64,
    expected_slot: u64,
    expected_tx_count: usize,
    expected_header_id: String,
    expected_prev_hash: Option<String>,
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// The fixtures live two levels above the crate root.
fn fixture_path(name: &str) -> std::path::PathBuf {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../../fixtures/blocks");
    p.push(name);
    p
}

fn load(name: &str) -> (Fixture, Vec<u8>) {
    let json = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture {name} not found: {e}"));
    let fixture: Fixture = serde_json::from_str(&json).unwrap();
    let bytes = hex::decode(&fixture.cbor).unwrap_or_else(|e| panic!("bad hex in {name}: {e}"));
    (fixture, bytes)
}

fn check(name: &str) -> Block {
    let (fixture, bytes) = load(name);
    let block = decode_block(fixture.block_type, &bytes)
        .unwrap_or_else(|e| panic!("{}: {e}", fixture.description));

    assert_eq!(block.era(), fixture.expected_era, "{name}: era");
    assert_eq!(block.block_number(), fixture.expected_block_number, "{name}: block number");
    assert_eq!(block.slot_number(), fixture.expected_slot, "{name}: slot");
    assert_eq!(block.transaction_count(), fixture.expected_tx_count, "{name}: tx count");
    assert_eq!(block.id_hex(), fixture.expected_header_id, "{name}: header id");
    assert_eq!(
        block.prev_hash().map(|h| h.to_hex()),
        fixture.expected_prev_hash,
        "{name}: prev hash"
    );
    block
}

// ─── Per-era fixtures ─────────────────────────────────────────────────────────

#[test]
fn byron_epoch_boundary_golden() {
    match check("synthetic-byron-epoch-boundary.json") {
        Block::ByronEpochBoundary(b) => {
            assert_eq!(b.header.epoch, 88);
            assert_eq!(b.header.difficulty, 1_911_000);
            assert_eq!(b.stakeholders.len(), 3);
        }
        other => panic!("unexpected variant for era {}", other.era()),
    }
}

#[test]
fn byron_main_golden() {
    match check("synthetic-byron-main.json") {
        Block::ByronMain(b) => {
            assert_eq!(b.header.epoch(), 88);
            assert_eq!(b.header.protocol_magic, 764_824_073);
            assert_eq!(b.header.extra_data.software_version.name, "cardano-sl");
            assert_eq!(b.header.extra_data.block_version.minor, 2);
        }
        other => panic!("unexpected variant for era {}", other.era()),
    }
}

#[test]
fn shelley_golden() {
    match check("synthetic-shelley.json") {
        Block::Shelley(b) => {
            assert_eq!(b.transaction_bodies[0].fee, 170_000);
            assert_eq!(b.transaction_bodies[1].inputs[0].index, 1);
            assert!(b.transaction_bodies[1].metadata_hash.is_some());
            assert_eq!(b.transaction_metadata_set.len(), 1);
            assert!(b.transaction_metadata_set.contains_key(&1));
            assert_eq!(b.header.body.protocol_version.major, 2);
        }
        other => panic!("unexpected variant for era {}", other.era()),
    }
}

#[test]
fn mary_golden() {
    match check("synthetic-mary.json") {
        Block::Mary(b) => {
            let body = &b.transaction_bodies[0];
            assert!(body.mint.is_some());
            assert_eq!(body.validity_interval_start, 19_000);
            assert_eq!(body.outputs[0].amount.coin(), 1_500_000);
        }
        other => panic!("unexpected variant for era {}", other.era()),
    }
}

#[test]
fn alonzo_golden() {
    match check("synthetic-alonzo.json") {
        Block::Alonzo(b) => {
            assert_eq!(b.invalid_transactions, vec![0]);
            let body = &b.transaction_bodies[0];
            assert_eq!(body.network_id, 1);
            assert_eq!(body.collateral[0].index, 5);
            assert!(body.script_data_hash.is_some());
            let ws = &b.transaction_witness_sets[0];
            assert!(ws.plutus_scripts.is_some());
            assert!(ws.redeemers.is_some());
        }
        other => panic!("unexpected variant for era {}", other.era()),
    }
}

#[test]
fn babbage_golden() {
    match check("synthetic-babbage.json") {
        Block::Babbage(b) => {
            let body = &b.transaction_bodies[0];
            assert_eq!(body.outputs.len(), 2);
            assert_eq!(body.total_collateral, Some(3_000_000));
            assert_eq!(body.reference_inputs[0].index, 7);
            assert_eq!(b.header.body.protocol_version.major, 8);
        }
        other => panic!("unexpected variant for era {}", other.era()),
    }
}

// ─── Cross-checks ─────────────────────────────────────────────────────────────

#[test]
fn header_id_is_stable_across_decodes() {
    let (fixture, bytes) = load("synthetic-shelley.json");
    let a = decode_block(fixture.block_type, &bytes).unwrap().id();
    let b = decode_block(fixture.block_type, &bytes).unwrap().id();
    assert_eq!(a, b);
}

#[test]
fn block_serializes_to_json() {
    let block = check("synthetic-babbage.json");
    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(json["kind"], "babbage");
    assert_eq!(
        json["block"]["header"]["id"].as_str(),
        Some(block.id_hex().as_str())
    );
}

#[test]
fn standalone_header_matches_block() {
    for name in ["synthetic-shelley.json", "synthetic-babbage.json", "synthetic-byron-main.json"] {
        let (fixture, bytes) = load(name);
        // every fixture envelope has a one-byte array head; the bytes after
        // the header are trailing input to a standalone decode
        let standalone = decode_block_header(fixture.block_type, &bytes[1..]).unwrap();
        let header = decode_block(fixture.block_type, &bytes)
            .unwrap()
            .into_header();
        assert_eq!(standalone.id(), header.id(), "{name}");
        assert_eq!(standalone.id_hex(), fixture.expected_header_id, "{name}");
    }
}
