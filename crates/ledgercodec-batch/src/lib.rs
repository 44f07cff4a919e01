//! # ledgercodec-batch
//!
//! High-throughput batch decode engine for historical block processing.
//!
//! ## Features
//! - Memory-bounded chunking (default 1,024 blocks per chunk)
//! - CPU-parallel decoding via Rayon, optionally on a dedicated pool
//! - Progress callbacks (for progress bars / ETAs)
//! - Three error modes: Skip, Collect, Throw
//!
//! ## Usage
//! ```no_run
//! use ledgercodec_batch::{BatchEngine, BatchRequest, ErrorMode, RawBlock};
//!
//! let blocks = vec![RawBlock::new(2, std::fs::read("block.cbor").unwrap())];
//! let request = BatchRequest::new(blocks).error_mode(ErrorMode::Collect);
//! let result = BatchEngine::new().decode(request).unwrap();
//! println!("{} decoded, {} errors", result.blocks.len(), result.errors.len());
//! ```

pub mod engine;
pub mod request;

pub use engine::{BatchEngine, BatchResult};
pub use request::{BatchRequest, BatchSettings, ErrorMode, RawBlock};
