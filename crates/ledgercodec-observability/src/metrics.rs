//! LedgerCodec metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. Without a meter provider
//! installed they are no-ops.

use ledgercodec_core::{Era, LedgerError};
use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for LedgerCodec.
#[derive(Clone)]
pub struct LedgerCodecMetrics {
    pub blocks_decoded: Counter<u64>,
    pub decode_errors: Counter<u64>,
    pub decode_latency_ms: Histogram<f64>,
    pub batch_size: Histogram<u64>,
}

impl LedgerCodecMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            blocks_decoded: meter
                .u64_counter("ledgercodec.blocks_decoded")
                .with_description("Total number of successfully decoded blocks")
                .build(),
            decode_errors: meter
                .u64_counter("ledgercodec.decode_errors")
                .with_description("Blocks that failed to decode")
                .build(),
            decode_latency_ms: meter
                .f64_histogram("ledgercodec.decode_latency_ms")
                .with_description("Time to decode a single block in milliseconds")
                .build(),
            batch_size: meter
                .u64_histogram("ledgercodec.batch_size")
                .with_description("Number of blocks in a batch decode request")
                .build(),
        }
    }

    /// Handle bound to the global meter provider.
    pub fn global() -> Self {
        Self::new(&opentelemetry::global::meter("ledgercodec"))
    }

    pub fn record_decoded(&self, era: Era) {
        self.blocks_decoded
            .add(1, &[KeyValue::new("era", era.name())]);
    }

    pub fn record_error(&self, err: &LedgerError) {
        self.decode_errors
            .add(1, &[KeyValue::new("error_type", error_type(err))]);
    }

    pub fn record_latency(&self, ms: f64, era: Era) {
        self.decode_latency_ms
            .record(ms, &[KeyValue::new("era", era.name())]);
    }

    pub fn record_batch(&self, size: usize) {
        self.batch_size.record(size as u64, &[]);
    }
}

/// Low-cardinality label for an error.
pub fn error_type(err: &LedgerError) -> &'static str {
    match err {
        LedgerError::Decode(_) => "decode",
        LedgerError::UnknownTypeTag { .. } => "unknown_type_tag",
        LedgerError::HashDerivation(_) => "hash_derivation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgercodec_core::TagSpace;

    #[test]
    fn recording_without_provider_is_a_noop() {
        let metrics = LedgerCodecMetrics::global();
        metrics.record_decoded(Era::Babbage);
        metrics.record_latency(0.25, Era::Babbage);
        metrics.record_batch(10);
        metrics.record_error(&LedgerError::UnknownTypeTag {
            space: TagSpace::BlockType,
            tag: 9,
        });
    }

    #[test]
    fn error_labels() {
        let err = LedgerError::UnknownTypeTag {
            space: TagSpace::TransactionType,
            tag: 9,
        };
        assert_eq!(error_type(&err), "unknown_type_tag");
    }
}
