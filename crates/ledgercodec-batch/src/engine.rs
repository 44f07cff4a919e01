//! `BatchEngine`: orchestrates chunked, parallel block decoding.

use crate::request::{BatchRequest, BatchSettings, ErrorMode, RawBlock};
use ledgercodec_core::{BatchDecodeError, LedgerError};
use ledgercodec_eras::{decode_block, Block};
use rayon::prelude::*;
use tracing::{debug, info};

/// Result of a batch decode job.
#[derive(Debug)]
pub struct BatchResult {
    /// (original_index, block) pairs, in input order
    pub blocks: Vec<(usize, Block)>,
    /// (original_index, error) pairs, only populated in Collect mode
    pub errors: Vec<(usize, LedgerError)>,
    /// Total raw blocks processed
    pub total_input: usize,
}

/// Batch decode engine.
///
/// Decoding is stateless; the engine only owns the optional dedicated
/// thread pool, so one engine can serve any number of requests.
#[derive(Debug, Default)]
pub struct BatchEngine {
    pool: Option<rayon::ThreadPool>,
}

impl BatchEngine {
    /// An engine running on the global Rayon pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// An engine with its own pool of `threads` workers (0 = global pool).
    pub fn with_threads(threads: usize) -> Result<Self, BatchDecodeError> {
        if threads == 0 {
            return Ok(Self::new());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("ledgercodec-batch-{i}"))
            .build()
            .map_err(|e| BatchDecodeError::Other(format!("thread pool: {e}")))?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn from_settings(settings: &BatchSettings) -> Result<Self, BatchDecodeError> {
        Self::with_threads(settings.threads)
    }

    fn decode_chunk(
        &self,
        chunk: &[RawBlock],
        offset: usize,
    ) -> Vec<(usize, Result<Block, LedgerError>)> {
        let run = || -> Vec<(usize, Result<Block, LedgerError>)> {
            chunk
                .par_iter()
                .enumerate()
                .map(|(i, raw)| (offset + i, decode_block(raw.block_type, &raw.data)))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Execute a batch decode request.
    pub fn decode(&self, req: BatchRequest) -> Result<BatchResult, BatchDecodeError> {
        let total_input = req.blocks.len();
        let chunk_size = req.chunk_size.max(1);
        info!(
            "BatchEngine: decoding {} blocks (chunk_size={}, mode={:?})",
            total_input, chunk_size, req.error_mode
        );

        let mut all_blocks: Vec<(usize, Block)> = Vec::with_capacity(total_input);
        let mut all_errors: Vec<(usize, LedgerError)> = Vec::new();
        let mut global_offset = 0usize;

        for chunk in req.blocks.chunks(chunk_size) {
            for (index, result) in self.decode_chunk(chunk, global_offset) {
                match result {
                    Ok(block) => all_blocks.push((index, block)),
                    Err(err) => {
                        debug!(index, error = %err, "block decode failed");
                        match req.error_mode {
                            ErrorMode::Skip => {}
                            ErrorMode::Collect => {
                                all_errors.push((index, err));
                                if let Some(max) = req.max_errors {
                                    if all_errors.len() > max {
                                        return Err(BatchDecodeError::TooManyErrors {
                                            count: all_errors.len(),
                                        });
                                    }
                                }
                            }
                            ErrorMode::Throw => {
                                return Err(BatchDecodeError::ItemFailed { index, source: err });
                            }
                        }
                    }
                }
            }

            global_offset += chunk.len();
            if let Some(cb) = &req.on_progress {
                cb(global_offset, total_input);
            }
        }

        info!(
            "BatchEngine: complete, {} decoded, {} errors",
            all_blocks.len(),
            all_errors.len()
        );

        Ok(BatchResult {
            blocks: all_blocks,
            errors: all_errors,
            total_input,
        })
    }
}
