//! `ledgercodec batch`: decode every block listed in a manifest.
//!
//! Manifest format (YAML or JSON):
//! ```yaml
//! - blockType: 2
//!   path: blocks/shelley-0001.cbor
//! - blockType: 6
//!   path: blocks/babbage-0001.hex
//! ```
//! Relative paths resolve against the manifest's directory.

use crate::input;
use anyhow::{Context, Result};
use ledgercodec_batch::{BatchEngine, BatchRequest, BatchSettings, RawBlock};
use ledgercodec_observability::LedgerCodecMetrics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub block_type: u64,
    pub path: PathBuf,
}

#[derive(Serialize)]
struct BlockSummary {
    index: usize,
    era: String,
    id: String,
    block_number: u64,
    slot: u64,
    transactions: usize,
}

#[derive(Serialize)]
struct ErrorSummary {
    index: usize,
    path: String,
    error: String,
}

pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read manifest '{}'", path.display()))?;
    let mut entries: Vec<ManifestEntry> =
        serde_yaml::from_str(&text).with_context(|| format!("parse manifest '{}'", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for entry in &mut entries {
        if entry.path.is_relative() {
            entry.path = base.join(&entry.path);
        }
    }
    Ok(entries)
}

pub fn run(manifest: &Path, settings: &BatchSettings, as_json: bool) -> Result<()> {
    let entries = load_manifest(manifest)?;
    let blocks = entries
        .iter()
        .map(|e| Ok(RawBlock::new(e.block_type, input::read_file(&e.path)?)))
        .collect::<Result<Vec<_>>>()?;

    let metrics = LedgerCodecMetrics::global();
    metrics.record_batch(blocks.len());

    let engine = BatchEngine::from_settings(settings)?;
    let request = BatchRequest::with_settings(blocks, settings);

    let start = Instant::now();
    let result = engine.decode(request)?;
    let elapsed = start.elapsed();

    let per_block_ms = elapsed.as_secs_f64() * 1_000.0 / result.total_input.max(1) as f64;
    for (_, block) in &result.blocks {
        metrics.record_decoded(block.era());
        metrics.record_latency(per_block_ms, block.era());
    }
    for (_, err) in &result.errors {
        metrics.record_error(err);
    }

    let blocks: Vec<BlockSummary> = result
        .blocks
        .iter()
        .map(|(index, b)| BlockSummary {
            index: *index,
            era: b.era().to_string(),
            id: b.id_hex(),
            block_number: b.block_number(),
            slot: b.slot_number(),
            transactions: b.transaction_count(),
        })
        .collect();
    let errors: Vec<ErrorSummary> = result
        .errors
        .iter()
        .map(|(index, e)| ErrorSummary {
            index: *index,
            path: entries[*index].path.display().to_string(),
            error: e.to_string(),
        })
        .collect();

    if as_json {
        let out = serde_json::json!({
            "total": result.total_input,
            "decoded": blocks,
            "errors": errors,
            "durationMs": elapsed.as_secs_f64() * 1_000.0,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for b in &blocks {
        println!(
            "  ✓ #{:<5} {:8} {}  block={} slot={} txs={}",
            b.index, b.era, b.id, b.block_number, b.slot, b.transactions
        );
    }
    for e in &errors {
        eprintln!("  ✗ #{:<5} {}: {}", e.index, e.path, e.error);
    }

    let total = result.total_input;
    println!();
    println!("Results:");
    println!("  Total:      {} blocks", total);
    println!(
        "  Decoded:    {} ({:.1}%)",
        blocks.len(),
        100.0 * blocks.len() as f64 / total.max(1) as f64
    );
    println!("  Errors:     {}", errors.len());
    println!("  Duration:   {:.3}s", elapsed.as_secs_f64());
    println!(
        "  Throughput: {:.0} blocks/sec",
        total as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_paths_resolve_against_its_directory() {
        let dir = std::env::temp_dir().join(format!("ledgercodec-manifest-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let manifest = dir.join("manifest.yaml");
        std::fs::write(
            &manifest,
            "- blockType: 2\n  path: a.cbor\n- blockType: 6\n  path: /abs/b.hex\n",
        )
        .unwrap();

        let entries = load_manifest(&manifest).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].block_type, 2);
        assert_eq!(entries[0].path, dir.join("a.cbor"));
        assert_eq!(entries[1].path, PathBuf::from("/abs/b.hex"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
