//! Batch decode request configuration.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One raw block and the block-type tag of its envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub block_type: u64,
    pub data: Bytes,
}

impl RawBlock {
    pub fn new(block_type: u64, data: impl Into<Bytes>) -> Self {
        Self {
            block_type,
            data: data.into(),
        }
    }
}

/// Controls how the batch engine reacts to individual decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Silently skip blocks that fail to decode.
    #[default]
    Skip,
    /// Collect decode errors alongside successes and return both at the end.
    Collect,
    /// Abort the entire batch on first error.
    Throw,
}

/// Engine-level settings, loadable from a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Max blocks per chunk (memory safety).
    pub chunk_size: usize,
    pub error_mode: ErrorMode,
    /// Dedicated Rayon worker count (0 = the global pool).
    pub threads: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            error_mode: ErrorMode::Skip,
            threads: 0,
        }
    }
}

pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Configuration for a batch decode job.
pub struct BatchRequest {
    /// The raw blocks to decode
    pub blocks: Vec<RawBlock>,
    /// Max blocks per chunk
    pub chunk_size: usize,
    /// How to handle decode errors
    pub error_mode: ErrorMode,
    /// In `Collect` mode, abort once more than this many errors are seen
    pub max_errors: Option<usize>,
    /// Optional progress callback, called after each chunk with
    /// `(processed, total)`
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

impl BatchRequest {
    pub fn new(blocks: Vec<RawBlock>) -> Self {
        Self {
            blocks,
            chunk_size: DEFAULT_CHUNK_SIZE,
            error_mode: ErrorMode::Skip,
            max_errors: None,
            on_progress: None,
        }
    }

    /// Start from file or CLI settings.
    pub fn with_settings(blocks: Vec<RawBlock>, settings: &BatchSettings) -> Self {
        Self::new(blocks)
            .chunk_size(settings.chunk_size)
            .error_mode(settings.error_mode)
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n;
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn max_errors(mut self, n: usize) -> Self {
        self.max_errors = Some(n);
        self
    }

    pub fn on_progress<F: Fn(usize, usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let s = BatchSettings::default();
        assert_eq!(s.chunk_size, 1024);
        assert_eq!(s.error_mode, ErrorMode::Skip);
        assert_eq!(s.threads, 0);
    }

    #[test]
    fn settings_from_partial_yaml() {
        let s: BatchSettings = serde_yaml::from_str("error_mode: collect\nthreads: 4\n").unwrap();
        assert_eq!(s.error_mode, ErrorMode::Collect);
        assert_eq!(s.threads, 4);
        assert_eq!(s.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn builder_applies_settings() {
        let settings = BatchSettings {
            chunk_size: 8,
            error_mode: ErrorMode::Throw,
            threads: 0,
        };
        let req = BatchRequest::with_settings(vec![RawBlock::new(2, vec![0x80])], &settings)
            .max_errors(3);
        assert_eq!(req.chunk_size, 8);
        assert_eq!(req.error_mode, ErrorMode::Throw);
        assert_eq!(req.max_errors, Some(3));
        assert_eq!(req.blocks[0].data.as_ref(), &[0x80]);
    }
}
