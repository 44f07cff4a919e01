//! # ledgercodec-observability
//!
//! OpenTelemetry-based observability for LedgerCodec.
//!
//! ## Built-in metrics
//! - `ledgercodec.blocks_decoded`: counter, tagged with era
//! - `ledgercodec.decode_errors`: counter, tagged with error_type
//! - `ledgercodec.decode_latency_ms`: histogram, tagged with era
//! - `ledgercodec.batch_size`: histogram
//!
//! ## Structured logging
//! JSON-structured or human-readable logs, with levels configurable per
//! component. The decode libraries themselves never log; only the batch
//! engine and the CLI emit events.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::LedgerCodecMetrics;
pub use tracing_setup::{filter_directives, init_tracing, LogConfig};
