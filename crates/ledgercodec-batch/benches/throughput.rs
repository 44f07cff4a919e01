//! Batch decode throughput benchmarks.
//!
//! Measures block decode throughput at various batch sizes using Criterion,
//! over a rotation of the golden fixtures (one block per era variant).
//!
//! # Running
//! ```bash
//! cargo bench --package ledgercodec-batch
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ledgercodec_batch::{BatchEngine, BatchRequest, ErrorMode, RawBlock};
use ledgercodec_eras::decode_block;

// ─── Fixture loading ──────────────────────────────────────────────────────────

fn load_fixtures() -> Vec<RawBlock> {
    let mut dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("../../fixtures/blocks");
    let mut paths: Vec<_> = std::fs::read_dir(&dir)
        .expect("fixtures directory")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|p| {
            let json: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap();
            let block_type = json["blockType"].as_u64().unwrap();
            let bytes = hex::decode(json["cbor"].as_str().unwrap()).unwrap();
            RawBlock::new(block_type, bytes)
        })
        .collect()
}

fn make_batch(fixtures: &[RawBlock], n: usize) -> Vec<RawBlock> {
    fixtures.iter().cycle().take(n).cloned().collect()
}

// ─── Benchmarks ───────────────────────────────────────────────────────────────

fn bench_sequential_decode(c: &mut Criterion) {
    let fixtures = load_fixtures();

    let mut group = c.benchmark_group("sequential_decode");
    for batch_size in [100, 1_000, 10_000] {
        let batch = make_batch(&fixtures, batch_size);
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch, |b, batch| {
            b.iter(|| {
                for raw in batch {
                    let _ = decode_block(raw.block_type, &raw.data);
                }
            });
        });
    }
    group.finish();
}

fn bench_parallel_decode(c: &mut Criterion) {
    let fixtures = load_fixtures();
    let engine = BatchEngine::new();

    let mut group = c.benchmark_group("parallel_decode_rayon");
    for batch_size in [1_000, 10_000, 100_000] {
        let batch = make_batch(&fixtures, batch_size);
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch, |b, batch| {
            b.iter(|| {
                let req = BatchRequest::new(batch.clone()).error_mode(ErrorMode::Skip);
                let _ = engine.decode(req);
            });
        });
    }
    group.finish();
}

fn bench_header_id(c: &mut Criterion) {
    let fixtures = load_fixtures();
    let raw = &fixtures[0];

    c.bench_function("decode_and_hash_single", |b| {
        b.iter(|| decode_block(raw.block_type, &raw.data).map(|block| block.id()));
    });
}

criterion_group!(
    benches,
    bench_sequential_decode,
    bench_parallel_decode,
    bench_header_id,
);
criterion_main!(benches);
