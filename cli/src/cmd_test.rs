//! `ledgercodec test`: run golden block fixture files.
//!
//! Fixture format (JSON):
//! ```json
//! {
//!   "description": "Synthetic Shelley block with two transactions",
//!   "blockType": 2,
//!   "cbor": "84828f1903e8...",
//!   "expectedEra": "shelley",
//!   "expectedBlockNumber": 1000,
//!   "expectedSlot": 10000,
//!   "expectedTxCount": 2,
//!   "expectedHeaderId": "9d754397...",
//!   "expectedPrevHash": "9e0c3e8b..."
//! }
//! ```

use anyhow::Result;
use ledgercodec_core::Era;
use ledgercodec_eras::decode_block;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    description: Option<String>,
    block_type: u64,
    cbor: String,
    expected_era: Era,
    #[serde(default)]
    expected_block_number: Option<u64>,
    #[serde(default)]
    expected_slot: Option<u64>,
    #[serde(default)]
    expected_tx_count: Option<usize>,
    #[serde(default)]
    expected_header_id: Option<String>,
    #[serde(default)]
    expected_prev_hash: Option<String>,
}

pub fn run(fixtures_dir: &str, era_filter: Option<Era>, verbose: bool) -> Result<()> {
    let dir = Path::new(fixtures_dir);
    if !dir.exists() {
        println!("Fixtures directory '{}' not found, skipping", fixtures_dir);
        return Ok(());
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    let mut fixture_paths = Vec::new();
    collect_json_files(dir, &mut fixture_paths)?;
    fixture_paths.sort();

    for path in &fixture_paths {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("  ✗ {}: read error: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        let fixture: Fixture = match serde_json::from_str(&content) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("  ✗ {}: parse error: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        if let Some(filter) = era_filter {
            if fixture.expected_era != filter {
                skipped += 1;
                continue;
            }
        }

        let name = path.display().to_string();
        let desc = fixture.description.as_deref().unwrap_or(&name);

        let bytes = match hex::decode(fixture.cbor.trim()) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("  ✗ {}: invalid cbor hex: {}", desc, e);
                failed += 1;
                continue;
            }
        };

        let block = match decode_block(fixture.block_type, &bytes) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("  ✗ {}: decode error: {}", desc, e);
                failed += 1;
                continue;
            }
        };

        let mut errors: Vec<String> = Vec::new();
        if block.era() != fixture.expected_era {
            errors.push(format!(
                "era mismatch: got '{}', want '{}'",
                block.era(),
                fixture.expected_era
            ));
        }
        check(&mut errors, "block number", block.block_number(), fixture.expected_block_number);
        check(&mut errors, "slot", block.slot_number(), fixture.expected_slot);
        check(&mut errors, "tx count", block.transaction_count(), fixture.expected_tx_count);
        if let Some(want) = &fixture.expected_header_id {
            let got = block.id_hex();
            if !got.eq_ignore_ascii_case(want) {
                errors.push(format!("header id: got '{}', want '{}'", got, want));
            }
        }
        if let Some(want) = &fixture.expected_prev_hash {
            match block.prev_hash() {
                Some(got) if got.to_hex().eq_ignore_ascii_case(want) => {}
                got => errors.push(format!(
                    "prev hash: got '{}', want '{}'",
                    got.map(|h| h.to_hex()).unwrap_or_else(|| "none".into()),
                    want
                )),
            }
        }

        if errors.is_empty() {
            println!("  ✓ {}", desc);
            if verbose {
                println!("      era:          {}", block.era());
                println!("      header id:    {}", block.id_hex());
                println!("      block number: {}", block.block_number());
                println!("      slot:         {}", block.slot_number());
                println!("      transactions: {}", block.transaction_count());
            }
            passed += 1;
        } else {
            eprintln!("  ✗ {}", desc);
            for e in &errors {
                eprintln!("      {}", e);
            }
            failed += 1;
        }
    }

    println!();
    println!(
        "Results: {} passed, {} failed, {} skipped  (total fixtures: {})",
        passed,
        failed,
        skipped,
        fixture_paths.len()
    );

    if failed > 0 {
        anyhow::bail!("{} fixture(s) failed", failed);
    }
    Ok(())
}

fn check<T: PartialEq + std::fmt::Display>(
    errors: &mut Vec<String>,
    what: &str,
    got: T,
    want: Option<T>,
) {
    if let Some(want) = want {
        if got != want {
            errors.push(format!("{}: got {}, want {}", what, got, want));
        }
    }
}

fn collect_json_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            out.push(path);
        }
    }
    Ok(())
}
